pub mod addresses;
pub mod blog_post_tea_categories;
pub mod blog_posts;
pub mod brands;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod product_variations;
pub mod products;
pub mod tea_categories;
pub mod variation_attributes;

pub use addresses::Entity as Addresses;
pub use blog_post_tea_categories::Entity as BlogPostTeaCategories;
pub use blog_posts::Entity as BlogPosts;
pub use brands::Entity as Brands;
pub use categories::Entity as Categories;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_variations::Entity as ProductVariations;
pub use products::Entity as Products;
pub use tea_categories::Entity as TeaCategories;
pub use variation_attributes::Entity as VariationAttributes;
