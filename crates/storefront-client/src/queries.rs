//! GraphQL documents sent to the Storefront API.
//!
//! Fragments are concatenated into each document with `concat!` so every
//! request is self-contained.

macro_rules! money_fragment {
    () => {
        "fragment MoneyFields on MoneyV2 { amount currencyCode }\n"
    };
}

macro_rules! image_fragment {
    () => {
        "fragment ImageFields on Image { url altText width height }\n"
    };
}

macro_rules! product_card_fragment {
    () => {
        r#"fragment ProductCard on Product {
  id
  title
  handle
  vendor
  productType
  priceRange {
    minVariantPrice { ...MoneyFields }
    maxVariantPrice { ...MoneyFields }
  }
  featuredImage { ...ImageFields }
  metafields(identifiers: [
    { namespace: "custom", key: "grouped_product" },
    { namespace: "custom", key: "grouped_products" }
  ]) { namespace key value type }
}
"#
    };
}

macro_rules! cart_fragment {
    () => {
        r#"fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  cost { subtotalAmount { ...MoneyFields } }
  lines(first: 100) {
    nodes {
      id
      quantity
      merchandise { ... on ProductVariant { id } }
      cost { totalAmount { ...MoneyFields } }
    }
  }
}
"#
    };
}

pub const COLLECTION_QUERY: &str = concat!(
    r#"query Collection(
  $handle: String!
  $first: Int!
  $after: String
  $sortKey: ProductCollectionSortKeys
  $reverse: Boolean
  $filters: [ProductFilter!]
) {
  collection(handle: $handle) {
    id
    handle
    title
    description
    image { ...ImageFields }
    products(first: $first, after: $after, sortKey: $sortKey, reverse: $reverse, filters: $filters) {
      nodes { ...ProductCard }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#,
    product_card_fragment!(),
    money_fragment!(),
    image_fragment!(),
);

pub const PRODUCT_QUERY: &str = concat!(
    r#"query Product($handle: String!) {
  product(handle: $handle) {
    ...ProductCard
    descriptionHtml
    variants(first: 250) {
      nodes {
        id
        title
        sku
        availableForSale
        selectedOptions { name value }
        price { ...MoneyFields }
        compareAtPrice { ...MoneyFields }
        image { ...ImageFields }
      }
    }
  }
}
"#,
    product_card_fragment!(),
    money_fragment!(),
    image_fragment!(),
);

pub const PRODUCT_PRICES_QUERY: &str = concat!(
    r#"query ProductPrices($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on Product {
      id
      priceRange {
        minVariantPrice { ...MoneyFields }
        maxVariantPrice { ...MoneyFields }
      }
    }
  }
}
"#,
    money_fragment!(),
);

pub const RECOMMENDATIONS_QUERY: &str = concat!(
    r#"query Recommendations($productId: ID!) {
  productRecommendations(productId: $productId) { ...ProductCard }
}
"#,
    product_card_fragment!(),
    money_fragment!(),
    image_fragment!(),
);

pub const PAGE_QUERY: &str = r#"query Page($handle: String!) {
  page(handle: $handle) {
    id
    handle
    title
    body
    bodySummary
    seo { title description }
  }
}
"#;

pub const METAOBJECTS_QUERY: &str = r#"query Metaobjects($type: String!, $first: Int!) {
  metaobjects(type: $type, first: $first) {
    nodes {
      id
      handle
      type
      fields { key value }
    }
  }
}
"#;

pub const CART_QUERY: &str = concat!(
    r#"query Cart($cartId: ID!) {
  cart(id: $cartId) { ...CartFields }
}
"#,
    cart_fragment!(),
    money_fragment!(),
);

pub const CART_CREATE_MUTATION: &str = concat!(
    r#"mutation CartCreate($input: CartInput!) {
  cartCreate(input: $input) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
"#,
    cart_fragment!(),
    money_fragment!(),
);

pub const CART_LINES_ADD_MUTATION: &str = concat!(
    r#"mutation CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
"#,
    cart_fragment!(),
    money_fragment!(),
);

pub const CART_LINES_UPDATE_MUTATION: &str = concat!(
    r#"mutation CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
"#,
    cart_fragment!(),
    money_fragment!(),
);
