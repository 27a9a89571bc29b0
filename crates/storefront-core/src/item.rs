//! Line Item Model
//!
//! A cart entry is one configured purchasable unit. Two entries are "the same"
//! when their `id`s match; nothing else is compared when merging.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a bedding set is bought
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PurchaseType {
    /// Main piece together with its topper
    SetWithTopper,
    /// Main piece only
    MainOnly,
    /// Topper only
    TopperOnly,
}

impl PurchaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetWithTopper => "set-with-topper",
            Self::MainOnly => "main-only",
            Self::TopperOnly => "topper-only",
        }
    }

    /// Label shown to shoppers and on payment pages
    pub fn label(&self) -> &'static str {
        match self {
            Self::SetWithTopper => "Set with topper",
            Self::MainOnly => "Main piece only",
            Self::TopperOnly => "Topper only",
        }
    }
}

/// Configuration facts needed to make and ship the item
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOptions {
    /// Width as entered (e.g. "140 cm")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,

    /// Height / drop as entered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    /// Embroidered monogram add-on
    #[serde(default)]
    pub embroidery: bool,

    /// Rod / rail hardware add-on
    #[serde(default)]
    pub hardware: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_type: Option<PurchaseType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Free-text size when the standard dimensions don't apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Index into the product's variant list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<u32>,

    /// Product-family specific options. Left open on purpose: curtains,
    /// blinds and bedding each carry their own fulfilment fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional: BTreeMap<String, String>,
}

impl ItemOptions {
    /// Human-readable dimensions, if any were given
    pub fn dimensions(&self) -> Option<String> {
        match (self.width.as_deref(), self.height.as_deref()) {
            (Some(w), Some(h)) => Some(format!("{w} x {h}")),
            (Some(w), None) => Some(format!("width {w}")),
            (None, Some(h)) => Some(format!("height {h}")),
            (None, None) => None,
        }
    }

    /// One-line summary for payment pages and order confirmations
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(dims) = self.dimensions() {
            parts.push(dims);
        }
        if let Some(color) = &self.color {
            parts.push(format!("color: {color}"));
        }
        if let Some(purchase_type) = self.purchase_type {
            parts.push(purchase_type.label().to_string());
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// One configured entry in the cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product + configuration key; the only field used for merge/removal
    pub id: String,

    /// Display name of the base product
    pub name: String,

    /// Unit price resolved for this configuration at add-time
    pub price: Decimal,

    pub quantity: u32,

    #[serde(default)]
    pub options: ItemOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            options: ItemOptions::default(),
            image: None,
        }
    }

    pub fn with_options(mut self, options: ItemOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Merge rule: identity is the id, nothing else
    pub fn same_entry(&self, other: &Self) -> bool {
        self.id == other.id
    }

    /// price × quantity
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_same_entry_ignores_other_fields() {
        let a = CartItem::new("p1", "Linen curtain", dec!(100.00), 1);
        let b = CartItem::new("p1", "Renamed", dec!(999.00), 5);
        let c = CartItem::new("p2", "Linen curtain", dec!(100.00), 1);

        assert!(a.same_entry(&b));
        assert!(!a.same_entry(&c));
    }

    #[test]
    fn test_line_total() {
        let item = CartItem::new("p1", "Blind", dec!(49.99), 3);
        assert_eq!(item.line_total(), dec!(149.97));
    }

    #[test]
    fn test_dimensions() {
        let mut options = ItemOptions {
            width: Some("140 cm".into()),
            height: Some("250 cm".into()),
            ..Default::default()
        };
        assert_eq!(options.dimensions().as_deref(), Some("140 cm x 250 cm"));

        options.height = None;
        assert_eq!(options.dimensions().as_deref(), Some("width 140 cm"));

        options.width = None;
        assert_eq!(options.dimensions(), None);
    }

    #[test]
    fn test_summary() {
        let options = ItemOptions {
            width: Some("200".into()),
            height: Some("220".into()),
            color: Some("sage".into()),
            purchase_type: Some(PurchaseType::SetWithTopper),
            ..Default::default()
        };
        assert_eq!(
            options.summary().as_deref(),
            Some("200 x 220, color: sage, Set with topper")
        );
        assert_eq!(ItemOptions::default().summary(), None);
    }
}
