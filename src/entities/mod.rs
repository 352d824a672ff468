pub mod article;
pub mod bar;
pub mod coupon;
pub mod favorite_bar;
pub mod follow_relation;
pub mod notification;
pub mod post;
pub mod post_image;
pub mod post_like;
pub mod sea_orm_active_enums;
pub mod user_coupon;
pub mod user_profile;
pub mod view_history;
