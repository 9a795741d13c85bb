//! SeaORM entities for `tb_product` and the `tb_product_category` join
//! table. The category entity lives in `domain_categories`.

pub mod product;
pub mod product_category;
