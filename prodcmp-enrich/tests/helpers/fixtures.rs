//! Record and candidate builders

use prodcmp_enrich::models::{
    ExpressProduct, HunterProduct, ProductItem, RecordId, SuggestionProduct,
};

/// Five local candidates; positions 1 and 3 have no image
pub fn local_candidates(prefix: &str) -> Vec<ProductItem> {
    (0..5)
        .map(|i| ProductItem {
            product_id: format!("{}-local-{}", prefix, i),
            product_title: format!("Local {}", i),
            product_main_image_url: if i == 1 || i == 3 {
                String::new()
            } else {
                format!("https://img.local/{}-{}.jpg", prefix, i)
            },
            target_sale_price: "1299".to_string(),
            avg_star: 4.5,
            sale: 10,
            ..Default::default()
        })
        .collect()
}

pub fn record(product_id: i64, image_url: &str) -> SuggestionProduct {
    SuggestionProduct {
        product_id: product_id.into(),
        shop_id: RecordId::Number(1),
        image_url: image_url.to_string(),
        products: local_candidates(&product_id.to_string()),
        ..Default::default()
    }
}

/// Rated match with an image
pub fn hunter_match(id: &str) -> HunterProduct {
    HunterProduct {
        product_id: id.to_string(),
        product_title: format!("Hunter {}", id),
        product_main_image_url: format!("https://img.hunter/{}.jpg", id),
        evaluate_rate: "96.0%".to_string(),
        latest_volume: "50".to_string(),
        ..Default::default()
    }
}

/// Rated match with an image
pub fn express_match(id: &str) -> ExpressProduct {
    ExpressProduct {
        id: id.to_string(),
        title: format!("Express {}", id),
        image_url: format!("https://img.express/{}.jpg", id),
        avg_rating_star: Some(4.6),
        volume: 120,
        sale_price: 9.99,
        original_price: 14.99,
        ..Default::default()
    }
}
