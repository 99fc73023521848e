//! Brand-name heuristics
//!
//! Ad titles follow loose agency conventions such as
//! `250415_OMD_The Home Depot_HD Home Awareness Q2'25_Element+PMEF`. These
//! helpers pull a concise brand name out of that shape for the overlay text
//! and the output file name.

use regex::Regex;
use std::sync::OnceLock;

/// Brand name used when the ad title gives nothing to work with
pub const DEFAULT_BRAND: &str = "Default Brand";

/// Derive a concise brand name from an AdTitle
pub fn extract_brand_name(ad_title: &str) -> String {
    if ad_title.is_empty() {
        return DEFAULT_BRAND.to_string();
    }

    // Agency pattern like "_OMD_Brand Name_" wins outright.
    static OMD_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = OMD_REGEX
        .get_or_init(|| Regex::new(r"(?i)_OMD_([^_]+)_").expect("Failed to compile brand regex"));

    if let Some(captures) = regex.captures(ad_title) {
        return captures[1].to_string();
    }

    // "Advertiser_BrandName_Campaign" shape: the second segment is usually
    // the brand, as long as it is not a short code.
    let parts: Vec<&str> = ad_title.split('_').collect();
    if parts.len() > 1 && parts[1].len() > 2 {
        return parts[1].to_string();
    }

    // First prominent capitalized segment.
    if let Some(part) = parts
        .iter()
        .find(|p| p.len() > 3 && p.starts_with(|c: char| c.is_uppercase()))
    {
        return part.to_string();
    }

    ad_title
        .split('(')
        .next()
        .unwrap_or(ad_title)
        .trim()
        .to_string()
}
