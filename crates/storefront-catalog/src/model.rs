//! Product Records
//!
//! What the shop sells and how each product family is priced.
//! Uses `rust_decimal` for all monetary values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::PurchaseType;

/// Product family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductFamily {
    Curtains,
    Blinds,
    Bedding,
}

impl ProductFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curtains => "curtains",
            Self::Blinds => "blinds",
            Self::Bedding => "bedding",
        }
    }
}

/// How a configured price is resolved
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingRule {
    /// One price regardless of configuration
    Fixed { price: Decimal },

    /// Made to measure: area × rate, never below `minimum`
    PerSquareMeter { rate: Decimal, minimum: Decimal },

    /// Bedding sold as a set or as separate pieces
    PerPurchaseType {
        set_with_topper: Decimal,
        main_only: Decimal,
        topper_only: Decimal,
    },

    /// Standard sizes, indexed by `variant`
    PerVariant { prices: Vec<Decimal> },
}

impl PricingRule {
    pub fn for_purchase_type(&self, purchase_type: PurchaseType) -> Option<Decimal> {
        match self {
            Self::PerPurchaseType {
                set_with_topper,
                main_only,
                topper_only,
            } => Some(match purchase_type {
                PurchaseType::SetWithTopper => *set_with_topper,
                PurchaseType::MainOnly => *main_only,
                PurchaseType::TopperOnly => *topper_only,
            }),
            _ => None,
        }
    }
}

/// A catalog product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog id (e.g. "velvet-curtain")
    pub id: String,

    /// Display name
    pub name: String,

    pub family: ProductFamily,

    pub pricing: PricingRule,

    /// Selectable colours; empty means not selectable
    #[serde(default)]
    pub colors: Vec<String>,

    /// Per-unit surcharge for embroidery, if offered
    #[serde(default)]
    pub embroidery_surcharge: Option<Decimal>,

    /// Per-unit surcharge for rod/rail hardware, if offered
    #[serde(default)]
    pub hardware_surcharge: Option<Decimal>,

    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        family: ProductFamily,
        pricing: PricingRule,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            family,
            pricing,
            colors: Vec::new(),
            embroidery_surcharge: None,
            hardware_surcharge: None,
            image: None,
        }
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_embroidery(mut self, surcharge: Decimal) -> Self {
        self.embroidery_surcharge = Some(surcharge);
        self
    }

    pub fn with_hardware(mut self, surcharge: Decimal) -> Self {
        self.hardware_surcharge = Some(surcharge);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether the product is made to measure
    pub fn is_custom_size(&self) -> bool {
        matches!(self.pricing, PricingRule::PerSquareMeter { .. })
    }

    /// Lowest price a shopper can see ("from ...")
    pub fn starting_price(&self) -> Decimal {
        match &self.pricing {
            PricingRule::Fixed { price } => *price,
            PricingRule::PerSquareMeter { minimum, .. } => *minimum,
            PricingRule::PerPurchaseType {
                set_with_topper,
                main_only,
                topper_only,
            } => (*set_with_topper).min(*main_only).min(*topper_only),
            PricingRule::PerVariant { prices } => {
                prices.iter().copied().min().unwrap_or(Decimal::ZERO)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_starting_price() {
        let sheet = Product::new(
            "sheet",
            "Sheet",
            ProductFamily::Bedding,
            PricingRule::PerVariant {
                prices: vec![dec!(129), dec!(89), dec!(159)],
            },
        );
        assert_eq!(sheet.starting_price(), dec!(89));

        let blind = Product::new(
            "blind",
            "Blind",
            ProductFamily::Blinds,
            PricingRule::PerSquareMeter {
                rate: dec!(120),
                minimum: dec!(99),
            },
        );
        assert_eq!(blind.starting_price(), dec!(99));
        assert!(blind.is_custom_size());
    }

    #[test]
    fn test_pricing_rule_json_shape() {
        let rule: PricingRule =
            serde_json::from_str(r#"{"kind":"per_square_meter","rate":"89.90","minimum":"150"}"#)
                .unwrap();
        assert_eq!(
            rule,
            PricingRule::PerSquareMeter {
                rate: dec!(89.90),
                minimum: dec!(150)
            }
        );
    }
}
