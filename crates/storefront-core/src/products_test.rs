use super::*;

fn usd(amount: &str) -> Money {
    Money::parse(amount, "USD").unwrap()
}

fn make_variant(id: &str, options: &[(&str, &str)], price: &str) -> Variant {
    Variant {
        id: id.to_string(),
        title: options
            .iter()
            .map(|(_, v)| *v)
            .collect::<Vec<_>>()
            .join(" / "),
        sku: None,
        selected_options: options
            .iter()
            .map(|(n, v)| SelectedOption {
                name: (*n).to_string(),
                value: (*v).to_string(),
            })
            .collect(),
        price: usd(price),
        compare_at_price: None,
        available_for_sale: true,
        image: None,
    }
}

fn make_product(variants: Vec<Variant>) -> Product {
    Product {
        id: "gid://shopify/Product/1".to_string(),
        title: "Lip Balm".to_string(),
        handle: "lip-balm".to_string(),
        vendor: Some("Acme".to_string()),
        product_type: None,
        description_html: None,
        price_range: PriceRange {
            min: usd("5.00"),
            max: usd("9.00"),
        },
        featured_image: Some(Image {
            url: "https://cdn.example.com/balm.png".to_string(),
            alt_text: None,
            width: None,
            height: None,
        }),
        metafields: vec![],
        is_grouped: false,
        child_product_ids: vec![],
        variants,
    }
}

#[test]
fn option_value_matches_name_case_insensitively() {
    let v = make_variant("v1", &[("Color", "Red"), ("Size", "8oz")], "5");
    assert_eq!(v.option_value("color"), Some("Red"));
    assert_eq!(v.option_value("SIZE"), Some("8oz"));
    assert_eq!(v.option_value("Format"), None);
}

#[test]
fn is_on_sale_requires_higher_compare_at() {
    let mut v = make_variant("v1", &[], "5");
    assert!(!v.is_on_sale());
    v.compare_at_price = Some(usd("5.00"));
    assert!(!v.is_on_sale());
    v.compare_at_price = Some(usd("6.00"));
    assert!(v.is_on_sale());
}

#[test]
fn grouped_children_none_for_plain_product() {
    let p = make_product(vec![]);
    assert!(p.grouped_children().is_none());
}

#[test]
fn grouped_children_from_child_list() {
    let mut p = make_product(vec![]);
    p.child_product_ids = vec!["gid://shopify/Product/2".to_string()];
    assert_eq!(p.grouped_children().map(<[String]>::len), Some(1));
}

#[test]
fn grouped_children_empty_when_flag_without_children() {
    let mut p = make_product(vec![]);
    p.is_grouped = true;
    assert_eq!(p.grouped_children(), Some(&[][..]));
}

#[test]
fn has_available_variants_checks_any() {
    let mut unavailable = make_variant("v1", &[], "5");
    unavailable.available_for_sale = false;
    let p = make_product(vec![unavailable.clone()]);
    assert!(!p.has_available_variants());
    let p = make_product(vec![unavailable, make_variant("v2", &[], "5")]);
    assert!(p.has_available_variants());
}

#[test]
fn summary_takes_min_price_and_image() {
    let p = make_product(vec![]);
    let s = ProductSummary::from(&p);
    assert_eq!(s.handle, "lip-balm");
    assert_eq!(s.price, Some(usd("5.00")));
    assert_eq!(s.image_url.as_deref(), Some("https://cdn.example.com/balm.png"));
}

#[test]
fn summary_tolerates_missing_optional_fields() {
    let s: ProductSummary =
        serde_json::from_str(r#"{"id":"1","handle":"h","title":"T"}"#).unwrap();
    assert!(s.price.is_none());
    assert!(s.image_url.is_none());
}
