//! 提示词构建 - 业务能力层
//!
//! 纯函数：相同的数量总是得到相同的提示词

use crate::models::Category;

/// 构建生成指定数量商品的提示词
///
/// 提示词包含数量、字段契约、类别枚举，以及"只输出 JSON 列表"的要求
pub fn build_generation_prompt(count: usize) -> String {
    let categories = join_categories(|_| true);
    let food = join_categories(Category::is_food);
    let non_food = join_categories(|c| !c.is_food());

    format!(
        r#"
Generate {count} unique and realistic FMCG (Fast-Moving Consumer Goods) product entries as a JSON list.

Every item in the list must have exactly these fields:
{{
  "id": "string (unique alphanumeric product ID, e.g., FMCG-XXXX)",
  "title": "string (short, market-ready product title)",
  "description": "string (detailed description of at least 50 words covering use-case and key features)",
  "category": "string (one of: {categories})",
  "brand": "string (realistic-sounding or fictional brand name)",
  "price": float (reasonable price in USD, e.g. 3.99),
  "tags": ["string", ...] (3-7 relevant keywords such as 'organic', 'sugar-free', 'vegan', 'eco-friendly', 'family size')
}}

Guidelines:
- IDs must be unique within this batch.
- Vary categories, brands and price points across the batch.
- For {food}: include nutrition facts per serving in the description.
- For {non_food}: include key ingredients or active compounds in the description.
- Keep descriptions informative, persuasive and realistic.

IMPORTANT: Output ONLY the raw JSON list starting with '[' and ending with ']'. Do NOT wrap it in ``` markers and do NOT add explanations or any other text. The output must be a single JSON list containing exactly {count} product objects.
"#
    )
}

fn join_categories(filter: impl Fn(Category) -> bool) -> String {
    Category::ALL
        .into_iter()
        .filter(|c| filter(*c))
        .map(Category::name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_count() {
        let prompt = build_generation_prompt(7);
        assert!(prompt.contains("Generate 7 unique"));
        assert!(prompt.contains("exactly 7 product objects"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_generation_prompt(3), build_generation_prompt(3));
        assert_ne!(build_generation_prompt(3), build_generation_prompt(4));
    }

    #[test]
    fn test_prompt_lists_all_categories() {
        let prompt = build_generation_prompt(2);
        for category in Category::ALL {
            assert!(prompt.contains(category.name()), "缺少类别: {}", category);
        }
    }

    #[test]
    fn test_prompt_splits_food_guidelines() {
        let prompt = build_generation_prompt(2);
        assert!(prompt.contains(
            "- For Beverages, Snacks, Dairy, Bakery, Frozen Foods, Canned Goods: include nutrition facts"
        ));
        assert!(prompt.contains(
            "- For Personal Care, Cleaning, Household, Baby Care, Pet Care: include key ingredients"
        ));
    }
}
