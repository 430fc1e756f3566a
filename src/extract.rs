//! Turns deciphered menu text into categories and priced items.
//!
//! The parser is a single pass over lines with no lookahead. A pending item
//! collects a name and description until a price closes it.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

const HEADER_MIN_LEN: usize = 3;
const HEADER_MAX_LEN: usize = 50;

const CATEGORY_KEYWORDS: &[&str] = &[
    "ANTIPAST", "PRIMI", "SECONDI", "CONTORNI", "DOLCI", "DESSERT", "PIZZE", "PIZZA", "BEVANDE",
    "VINI", "BIRRE", "BOLLICINE", "INSALATE", "ZUPPE", "CARNE", "PESCE", "CRUDI", "FRITTI",
    "FORMAGGI", "GELATI", "CAFFETTERIA", "PIATTI", "SPECIALITÀ", "MENU", "DEGUSTAZIONE",
    "APERITIVI", "COCKTAIL", "DISTILLATI", "AMARI", "TÈ", "TISANE",
];

// "<text> 12,50 €" with an optional euro sign before the amount as well.
static TRAILING_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<text>.*?)\s+)?(?:€\s*)?(?P<amount>\d{1,4}(?:[.,]\d{1,2})?)\s*(?i:€|eur|euro)?\s*$",
    )
    .expect("valid trailing price regex")
});

// "€ 12,50 <text>"
static LEADING_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?i:€|eur|euro)\s*(?P<amount>\d{1,4}(?:[.,]\d{1,2})?)\s*(?P<text>.*)$")
        .expect("valid leading price regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCategory {
    pub name: String,
    pub items: Vec<ParsedItem>,
}

/// Result of parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMenu {
    pub categories: Vec<ParsedCategory>,
    /// Priced items found before any category header.
    pub dropped_items: usize,
}

impl ParsedMenu {
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    fn push_item(&mut self, item: ParsedItem) {
        match self.categories.last_mut() {
            Some(category) => category.items.push(item),
            None => {
                debug!(name = %item.name, "dropping item found before any category");
                self.dropped_items += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceMatch {
    pub cents: u32,
    /// Whatever remains of the line once the price is removed.
    pub text: String,
}

#[derive(Debug)]
struct PendingItem {
    name: String,
    description: Vec<String>,
}

impl PendingItem {
    fn extend(pending: Option<PendingItem>, text: &str) -> PendingItem {
        match pending {
            Some(mut item) => {
                item.description.push(text.to_string());
                item
            }
            None => PendingItem {
                name: text.to_string(),
                description: Vec::new(),
            },
        }
    }

    fn finish(self, price_cents: u32) -> ParsedItem {
        let description = if self.description.is_empty() {
            None
        } else {
            Some(self.description.join(" "))
        };
        ParsedItem {
            name: self.name,
            description,
            price_cents,
        }
    }
}

pub fn is_junk_line(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.chars().all(|c| !c.is_alphanumeric())
}

pub fn is_category_header(line: &str) -> bool {
    let trimmed = line.trim();
    let len = trimmed.chars().count();
    if !(HEADER_MIN_LEN..=HEADER_MAX_LEN).contains(&len) {
        return false;
    }
    if !trimmed.chars().any(char::is_alphabetic) || trimmed.chars().any(char::is_lowercase) {
        return false;
    }
    if !CATEGORY_KEYWORDS.iter().any(|keyword| trimmed.contains(keyword)) {
        return false;
    }
    find_price(trimmed).is_none()
}

/// Looks for a trailing price first, then a leading one.
pub fn find_price(line: &str) -> Option<PriceMatch> {
    let caps = TRAILING_PRICE
        .captures(line)
        .or_else(|| LEADING_PRICE.captures(line))?;
    let cents = parse_cents(caps.name("amount")?.as_str())?;
    let text = caps.name("text").map(|m| m.as_str()).unwrap_or_default();
    Some(PriceMatch {
        cents,
        text: clean_residual(text).to_string(),
    })
}

fn clean_residual(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || "€.-–…:".contains(c))
}

fn parse_cents(amount: &str) -> Option<u32> {
    let normalized = amount.replace(',', ".");
    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized.as_str(), ""),
    };
    let whole = whole.parse::<u32>().ok()?;
    let fraction = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u32>().ok()? * 10,
        _ => fraction.parse::<u32>().ok()?,
    };
    Some(whole * 100 + fraction)
}

pub fn parse_menu_text(text: &str) -> ParsedMenu {
    let mut menu = ParsedMenu::default();
    let mut pending: Option<PendingItem> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if is_junk_line(line) {
            continue;
        }

        if is_category_header(line) {
            if let Some(item) = pending.take() {
                debug!(name = %item.name, "discarding unpriced item at category change");
            }
            menu.categories.push(ParsedCategory {
                name: line.to_string(),
                items: Vec::new(),
            });
            continue;
        }

        match find_price(line) {
            Some(price) => {
                if !price.text.is_empty() {
                    pending = Some(PendingItem::extend(pending.take(), &price.text));
                }
                match pending.take() {
                    Some(item) => menu.push_item(item.finish(price.cents)),
                    None => debug!(line, "price without an item name"),
                }
            }
            None => pending = Some(PendingItem::extend(pending.take(), line)),
        }
    }

    if let Some(item) = pending {
        debug!(name = %item.name, "discarding unpriced item at end of text");
    }

    menu
}
