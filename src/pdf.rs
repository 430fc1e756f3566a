//! Getting text out of menu PDFs, and finding those PDFs on a restaurant site.

use reqwest::{Client, Url};
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::error::ImportError;

const PDF_MAGIC: &[u8] = b"%PDF";

pub fn extract_text(bytes: &[u8]) -> Result<String, ImportError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ImportError::NotAPdf);
    }
    let text = pdf_extract::extract_text_from_mem(bytes)?;
    debug!(bytes = bytes.len(), chars = text.len(), "extracted pdf text");
    Ok(text)
}

pub fn parse_http_url(input: &str) -> Result<Url, ImportError> {
    match Url::parse(input.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(ImportError::InvalidUrl(input.to_string())),
    }
}

pub async fn download_pdf(client: &Client, url: &str) -> Result<Vec<u8>, ImportError> {
    let url = parse_http_url(url)?;
    info!(%url, "downloading menu pdf");
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}

/// Collects `.pdf` links from a page, resolved against `base`, first occurrence wins.
pub fn find_pdf_links(html: &str, base: &Url) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("valid anchor selector");

    let mut links: Vec<Url> = Vec::new();
    for element in doc.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let link = match base.join(href.trim()) {
            Ok(link) => link,
            Err(_) => continue,
        };
        if !link.path().to_lowercase().ends_with(".pdf") {
            continue;
        }
        if !links.contains(&link) {
            links.push(link);
        }
    }
    links
}

pub async fn discover_menu_pdfs(client: &Client, page_url: &str) -> Result<Vec<Url>, ImportError> {
    let base = parse_http_url(page_url)?;
    let body = client
        .get(base.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let links = find_pdf_links(&body, &base);
    info!(page = %base, found = links.len(), "discovered menu pdfs");
    Ok(links)
}
