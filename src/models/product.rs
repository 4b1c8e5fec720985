use serde::{Deserialize, Serialize};

/// 商品类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Beverages,
    Snacks,
    #[serde(rename = "Personal Care")]
    PersonalCare,
    Cleaning,
    Household,
    Dairy,
    Bakery,
    #[serde(rename = "Frozen Foods")]
    FrozenFoods,
    #[serde(rename = "Canned Goods")]
    CannedGoods,
    #[serde(rename = "Baby Care")]
    BabyCare,
    #[serde(rename = "Pet Care")]
    PetCare,
}

impl Category {
    /// 全部类别，顺序即提示词中的顺序
    pub const ALL: [Category; 11] = [
        Category::Beverages,
        Category::Snacks,
        Category::PersonalCare,
        Category::Cleaning,
        Category::Household,
        Category::Dairy,
        Category::Bakery,
        Category::FrozenFoods,
        Category::CannedGoods,
        Category::BabyCare,
        Category::PetCare,
    ];

    /// 输出文件中使用的名称
    pub fn name(self) -> &'static str {
        match self {
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::PersonalCare => "Personal Care",
            Category::Cleaning => "Cleaning",
            Category::Household => "Household",
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::FrozenFoods => "Frozen Foods",
            Category::CannedGoods => "Canned Goods",
            Category::BabyCare => "Baby Care",
            Category::PetCare => "Pet Care",
        }
    }

    /// 是否为食品饮料类（提示词中要求附带营养信息）
    pub fn is_food(self) -> bool {
        matches!(
            self,
            Category::Beverages
                | Category::Snacks
                | Category::Dairy
                | Category::Bakery
                | Category::FrozenFoods
                | Category::CannedGoods
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 单条商品记录
///
/// 生成结果本身以 `serde_json::Value` 保存；这里是输出契约的强类型视图，
/// 开启 `strict_schema` 时每条记录都必须能反序列化为该结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub brand: String,
    pub price: f64,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            let value = serde_json::to_value(category).unwrap();
            assert_eq!(value, json!(category.name()));
        }
    }

    #[test]
    fn test_product_deserialize() {
        let product: Product = serde_json::from_value(json!({
            "id": "FMCG-0001",
            "title": "Sparkling Lime Water",
            "description": "Refreshing lime flavoured sparkling water.",
            "category": "Beverages",
            "brand": "FizzCo",
            "price": 1.49,
            "tags": ["sugar-free", "vegan"]
        }))
        .unwrap();

        assert_eq!(product.category, Category::Beverages);
        assert!(product.category.is_food());
        assert_eq!(product.tags.len(), 2);
    }

    #[test]
    fn test_product_rejects_unknown_category() {
        let result = serde_json::from_value::<Product>(json!({
            "id": "FMCG-0002",
            "title": "Mystery Box",
            "description": "Unknown.",
            "category": "Electronics",
            "brand": "Nope",
            "price": 9.99,
            "tags": []
        }));
        assert!(result.is_err());
    }
}
