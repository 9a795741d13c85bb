//! SeaORM entities for `tb_user`, `tb_role` and the `tb_user_role`
//! join table.

pub mod role;
pub mod user;
pub mod user_role;
