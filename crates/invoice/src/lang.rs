//! Language packs: the closed set of labels needed to render any invoice

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The base language; its pack must exist and be complete before any other
/// pack is considered.
pub const BASE_LANG: &str = "en";

/// Errors raised while loading or validating language packs
#[derive(Debug, Error)]
pub enum LangError {
    #[error("required language file {} is missing: {source}", path.display())]
    Missing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse language file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("language file {} is missing required keys: {}", path.display(), keys.join(", "))]
    Incomplete {
        path: PathBuf,
        keys: Vec<&'static str>,
    },
}

/// All translatable strings loaded from `lang/<code>.json`
///
/// Every key is required and must be non-empty; [`LanguagePack::missing_keys`]
/// reports violations by key name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LanguagePack {
    #[serde(rename = "_title")]
    pub title: String,
    #[serde(rename = "_invNo")]
    pub inv_no: String,
    #[serde(rename = "_issueDate")]
    pub issue_date: String,
    #[serde(rename = "_saleDate")]
    pub sale_date: String,
    #[serde(rename = "_dueDate")]
    pub due_date: String,
    #[serde(rename = "_billingPeriod")]
    pub billing_period: String,
    #[serde(rename = "_seller")]
    pub seller: String,
    #[serde(rename = "_buyer")]
    pub buyer: String,
    #[serde(rename = "_item")]
    pub item: String,
    #[serde(rename = "_qty")]
    pub qty: String,
    #[serde(rename = "_unitNet")]
    pub unit_net: String,
    #[serde(rename = "_totalNet")]
    pub total_net: String,
    #[serde(rename = "_tax")]
    pub tax: String,
    #[serde(rename = "_na")]
    pub na: String,
    #[serde(rename = "_totalGross")]
    pub total_gross: String,
    #[serde(rename = "_notes")]
    pub notes: String,
    #[serde(rename = "_payment")]
    pub payment: String,
    #[serde(rename = "_bank")]
    pub bank: String,
    #[serde(rename = "_swift")]
    pub swift: String,
    #[serde(rename = "_accountNo")]
    pub account_no: String,
    #[serde(rename = "_totalNetPrice")]
    pub total_net_price: String,
    #[serde(rename = "_rate")]
    pub rate: String,
    #[serde(rename = "_amount")]
    pub amount: String,
    #[serde(rename = "_discount")]
    pub discount: String,
    #[serde(rename = "_totalGrossPrice")]
    pub total_gross_price: String,
    #[serde(rename = "_paid")]
    pub paid: String,
    #[serde(rename = "_totalDue")]
    pub total_due: String,
}

impl LanguagePack {
    /// Parse a pack from its JSON document (no completeness check)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Names of all required keys that are absent or empty
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let fields: [(&'static str, &String); 27] = [
            ("_title", &self.title),
            ("_invNo", &self.inv_no),
            ("_issueDate", &self.issue_date),
            ("_saleDate", &self.sale_date),
            ("_dueDate", &self.due_date),
            ("_billingPeriod", &self.billing_period),
            ("_seller", &self.seller),
            ("_buyer", &self.buyer),
            ("_item", &self.item),
            ("_qty", &self.qty),
            ("_unitNet", &self.unit_net),
            ("_totalNet", &self.total_net),
            ("_tax", &self.tax),
            ("_na", &self.na),
            ("_totalGross", &self.total_gross),
            ("_notes", &self.notes),
            ("_payment", &self.payment),
            ("_bank", &self.bank),
            ("_swift", &self.swift),
            ("_accountNo", &self.account_no),
            ("_totalNetPrice", &self.total_net_price),
            ("_rate", &self.rate),
            ("_amount", &self.amount),
            ("_discount", &self.discount),
            ("_totalGrossPrice", &self.total_gross_price),
            ("_paid", &self.paid),
            ("_totalDue", &self.total_due),
        ];

        fields
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(key, _)| *key)
            .collect()
    }
}

/// Read and fully validate a single pack file
fn load_pack_file(path: &Path) -> Result<LanguagePack, LangError> {
    let data = std::fs::read_to_string(path).map_err(|source| LangError::Missing {
        path: path.to_path_buf(),
        source,
    })?;

    let pack = LanguagePack::from_json(&data).map_err(|source| LangError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let missing = pack.missing_keys();
    if !missing.is_empty() {
        return Err(LangError::Incomplete {
            path: path.to_path_buf(),
            keys: missing,
        });
    }

    Ok(pack)
}

/// Load the pack for `code`, gated on a valid base pack
///
/// The base pack (`en`) must exist and pass the completeness check before any
/// other pack is read; both failures are fatal. There is no per-key fallback
/// from an incomplete pack to the base pack.
pub fn load_language(dir: &Path, code: &str) -> Result<LanguagePack, LangError> {
    let base_path = dir.join(format!("{BASE_LANG}.json"));
    let base = load_pack_file(&base_path)?;

    let code = if code.is_empty() { BASE_LANG } else { code };
    if code == BASE_LANG {
        return Ok(base);
    }

    load_pack_file(&dir.join(format!("{code}.json")))
}
