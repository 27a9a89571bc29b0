//! Configuration Pricing
//!
//! Turns a product plus the shopper's chosen options into a priced
//! [`CartItem`]. The price is resolved once here; the cart never re-prices.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use storefront_core::{CartItem, ItemOptions};

use crate::error::{CatalogError, Result};
use crate::model::{PricingRule, Product};

const CM2_PER_M2: i64 = 10_000;

/// Largest accepted measurement (100 m)
pub const MAX_CENTIMETERS: i64 = 10_000;

/// Parse a free-form measurement into centimetres.
///
/// Accepts "140", "140cm", "140 cm", "1.4 m", "1,4m" and "1400 mm". Bare
/// numbers are centimetres. Anything above [`MAX_CENTIMETERS`] is rejected.
pub fn parse_centimeters(raw: &str) -> Result<Decimal> {
    let invalid = || CatalogError::InvalidDimension(raw.to_string());

    let normalized = raw.trim().to_lowercase().replace(',', ".");
    let (number, factor) = if let Some(n) = normalized.strip_suffix("mm") {
        (n, Decimal::new(1, 1))
    } else if let Some(n) = normalized.strip_suffix("cm") {
        (n, Decimal::ONE)
    } else if let Some(n) = normalized.strip_suffix('m') {
        (n, Decimal::from(100))
    } else {
        (normalized.as_str(), Decimal::ONE)
    };

    let value = Decimal::from_str(number.trim()).map_err(|_| invalid())?;
    if value <= Decimal::ZERO {
        return Err(invalid());
    }

    let centimeters = value.checked_mul(factor).ok_or_else(invalid)?;
    if centimeters > Decimal::from(MAX_CENTIMETERS) {
        return Err(invalid());
    }
    Ok(centimeters)
}

/// Stable id for a product + configuration pair.
///
/// Identical configurations map to the same id so re-adding them merges in
/// the cart; any differing option yields a separate line. `|`, `=` and `\`
/// inside keys and values are backslash-escaped so no two configurations collide.
pub fn configuration_id(product_id: &str, options: &ItemOptions) -> String {
    let mut id = String::new();
    escape_into(&mut id, product_id);
    let mut push = |key: &str, value: &str| {
        id.push('|');
        escape_into(&mut id, key);
        id.push('=');
        escape_into(&mut id, value.trim());
    };

    if let Some(width) = &options.width {
        push("w", width);
    }
    if let Some(height) = &options.height {
        push("h", height);
    }
    if let Some(purchase_type) = options.purchase_type {
        push("type", purchase_type.as_str());
    }
    if let Some(color) = &options.color {
        push("color", color);
    }
    if let Some(variant) = options.variant {
        push("variant", &variant.to_string());
    }
    if options.embroidery {
        push("embroidery", "1");
    }
    if options.hardware {
        push("hardware", "1");
    }
    if let Some(custom_size) = &options.custom_size {
        push("size", custom_size);
    }
    if let Some(comment) = &options.comment {
        push("comment", comment);
    }
    // BTreeMap iterates sorted, so the id is order-independent
    for (key, value) in &options.additional {
        push(key, value);
    }

    id
}

fn escape_into(id: &mut String, raw: &str) {
    for ch in raw.chars() {
        if matches!(ch, '|' | '=' | '\\') {
            id.push('\\');
        }
        id.push(ch);
    }
}

/// Resolve the unit price of `product` for `options`
pub fn unit_price(product: &Product, options: &ItemOptions) -> Result<Decimal> {
    let base = match &product.pricing {
        PricingRule::Fixed { price } => *price,
        PricingRule::PerSquareMeter { rate, minimum } => {
            let width = options
                .width
                .as_deref()
                .ok_or(CatalogError::MissingDimension("width"))
                .and_then(parse_centimeters)?;
            let height = options
                .height
                .as_deref()
                .ok_or(CatalogError::MissingDimension("height"))
                .and_then(parse_centimeters)?;

            width
                .checked_mul(height)
                .and_then(|cm2| cm2.checked_div(Decimal::from(CM2_PER_M2)))
                .and_then(|area| area.checked_mul(*rate))
                .ok_or_else(|| overflow(product))?
                .max(*minimum)
        }
        rule @ PricingRule::PerPurchaseType { .. } => {
            let purchase_type = options.purchase_type.ok_or_else(|| unsupported(product, "purchase type"))?;
            rule.for_purchase_type(purchase_type)
                .ok_or_else(|| unsupported(product, purchase_type.as_str()))?
        }
        PricingRule::PerVariant { prices } => {
            let variant = options.variant.unwrap_or(0);
            usize::try_from(variant)
                .ok()
                .and_then(|index| prices.get(index))
                .copied()
                .ok_or_else(|| CatalogError::UnknownVariant {
                    product: product.id.clone(),
                    variant,
                })?
        }
    };

    let mut price = base;
    if options.embroidery {
        let surcharge = product
            .embroidery_surcharge
            .ok_or_else(|| unsupported(product, "embroidery"))?;
        price = price.checked_add(surcharge).ok_or_else(|| overflow(product))?;
    }
    if options.hardware {
        let surcharge = product
            .hardware_surcharge
            .ok_or_else(|| unsupported(product, "hardware"))?;
        price = price.checked_add(surcharge).ok_or_else(|| overflow(product))?;
    }

    Ok(price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Build a priced cart entry for `product` configured with `options`
pub fn quote(product: &Product, mut options: ItemOptions, quantity: u32) -> Result<CartItem> {
    if quantity == 0 {
        return Err(CatalogError::InvalidQuantity);
    }

    if let Some(color) = &options.color {
        let offered = product
            .colors
            .iter()
            .find(|c| c.eq_ignore_ascii_case(color.trim()))
            .ok_or_else(|| unsupported(product, color))?;
        options.color = Some(offered.clone());
    }

    let price = unit_price(product, &options)?;
    let id = configuration_id(&product.id, &options);

    tracing::debug!(product = %product.id, %id, %price, "Quoted configuration");

    let mut item = CartItem::new(id, product.name.clone(), price, quantity).with_options(options);
    item.image.clone_from(&product.image);
    Ok(item)
}

fn overflow(product: &Product) -> CatalogError {
    CatalogError::PriceOutOfRange(product.id.clone())
}

fn unsupported(product: &Product, option: &str) -> CatalogError {
    CatalogError::UnsupportedOption {
        product: product.id.clone(),
        option: option.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductFamily;
    use rust_decimal_macros::dec;
    use storefront_core::PurchaseType;

    fn curtain() -> Product {
        Product::new(
            "velvet-curtain",
            "Velvet curtain",
            ProductFamily::Curtains,
            PricingRule::PerSquareMeter {
                rate: dec!(89.90),
                minimum: dec!(150.00),
            },
        )
        .with_colors(["sage", "ivory"])
        .with_hardware(dec!(45.00))
    }

    fn duvet() -> Product {
        Product::new(
            "duvet-set",
            "Satin duvet set",
            ProductFamily::Bedding,
            PricingRule::PerPurchaseType {
                set_with_topper: dec!(499.00),
                main_only: dec!(379.00),
                topper_only: dec!(149.00),
            },
        )
        .with_embroidery(dec!(60.00))
    }

    fn sized(width: &str, height: &str) -> ItemOptions {
        ItemOptions {
            width: Some(width.into()),
            height: Some(height.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_centimeters() {
        assert_eq!(parse_centimeters("140").unwrap(), dec!(140));
        assert_eq!(parse_centimeters("140 cm").unwrap(), dec!(140));
        assert_eq!(parse_centimeters("1,4 m").unwrap(), dec!(140.0));
        assert_eq!(parse_centimeters("1400mm").unwrap(), dec!(140.0));
        assert!(parse_centimeters("wide").is_err());
        assert!(parse_centimeters("-5 cm").is_err());
        assert_eq!(parse_centimeters("100 m").unwrap(), dec!(10000));
        assert!(parse_centimeters("100.01 m").is_err());
    }

    #[test]
    fn test_huge_dimensions_rejected_without_panicking() {
        let result = quote(&curtain(), sized("79228162514264337593543950335", "100"), 1);
        assert!(matches!(result, Err(CatalogError::InvalidDimension(_))));

        let result = quote(&curtain(), sized("7922816251426433759354395033.5 m", "100"), 1);
        assert!(matches!(result, Err(CatalogError::InvalidDimension(_))));
    }

    #[test]
    fn test_oversized_rate_is_out_of_range() {
        let mut product = curtain();
        product.pricing = PricingRule::PerSquareMeter {
            rate: Decimal::MAX,
            minimum: dec!(150.00),
        };

        let result = quote(&product, sized("10000", "10000"), 1);
        assert!(matches!(result, Err(CatalogError::PriceOutOfRange(_))));
    }

    #[test]
    fn test_color_keyed_by_catalog_spelling() {
        let mut upper = sized("140", "250");
        upper.color = Some("Sage".into());
        let mut lower = sized("140", "250");
        lower.color = Some("sage ".into());

        let a = quote(&curtain(), upper, 1).unwrap();
        let b = quote(&curtain(), lower, 1).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.options.color.as_deref(), Some("sage"));
    }

    #[test]
    fn test_configuration_id_escapes_separators() {
        let mut injected = ItemOptions {
            comment: Some("x|embroidery=1".into()),
            ..Default::default()
        };
        let plain = ItemOptions {
            comment: Some("x".into()),
            embroidery: true,
            ..Default::default()
        };
        assert_ne!(configuration_id("p", &injected), configuration_id("p", &plain));
        assert_eq!(configuration_id("p", &injected), r"p|comment=x\|embroidery\=1");

        injected.comment = None;
        injected.additional.insert("a=b".into(), "c".into());
        let mut split = ItemOptions::default();
        split.additional.insert("a".into(), "b=c".into());
        assert_ne!(configuration_id("p", &injected), configuration_id("p", &split));
    }

    #[test]
    fn test_per_square_meter_price() {
        let item = quote(&curtain(), sized("140 cm", "250 cm"), 1).unwrap();
        // 1.4 m × 2.5 m × 89.90
        assert_eq!(item.price, dec!(314.65));
        assert_eq!(item.name, "Velvet curtain");
    }

    #[test]
    fn test_minimum_price_applies() {
        let item = quote(&curtain(), sized("50", "60"), 1).unwrap();
        assert_eq!(item.price, dec!(150.00));
    }

    #[test]
    fn test_missing_dimension() {
        let options = ItemOptions {
            width: Some("140".into()),
            ..Default::default()
        };
        assert!(matches!(
            quote(&curtain(), options, 1),
            Err(CatalogError::MissingDimension("height"))
        ));
    }

    #[test]
    fn test_purchase_type_and_surcharge() {
        let options = ItemOptions {
            purchase_type: Some(PurchaseType::MainOnly),
            embroidery: true,
            ..Default::default()
        };
        let item = quote(&duvet(), options, 2).unwrap();

        assert_eq!(item.price, dec!(439.00));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_unoffered_add_on_rejected() {
        let options = ItemOptions {
            purchase_type: Some(PurchaseType::MainOnly),
            hardware: true,
            ..Default::default()
        };
        assert!(matches!(
            quote(&duvet(), options, 1),
            Err(CatalogError::UnsupportedOption { .. })
        ));
    }

    #[test]
    fn test_unknown_color_rejected() {
        let mut options = sized("140", "250");
        options.color = Some("neon".into());
        assert!(quote(&curtain(), options, 1).is_err());
    }

    #[test]
    fn test_configuration_id_distinguishes_options() {
        let a = quote(&curtain(), sized("140", "250"), 1).unwrap();
        let b = quote(&curtain(), sized("140", "250"), 3).unwrap();
        let c = quote(&curtain(), sized("140", "260"), 1).unwrap();

        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(a.id, "velvet-curtain|w=140|h=250");
    }

    #[test]
    fn test_configuration_id_includes_additional_options_sorted() {
        let mut options = ItemOptions::default();
        options.additional.insert("pleat".into(), "wave".into());
        options.additional.insert("lining".into(), "blackout".into());

        assert_eq!(
            configuration_id("p", &options),
            "p|lining=blackout|pleat=wave"
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(matches!(
            quote(&curtain(), sized("140", "250"), 0),
            Err(CatalogError::InvalidQuantity)
        ));
    }
}
