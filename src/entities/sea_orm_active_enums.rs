use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "other")]
    Other,
    #[sea_orm(string_value = "unspecified")]
    Unspecified,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[sea_orm(string_value = "post_liked")]
    PostLiked,
    #[sea_orm(string_value = "followed")]
    Followed,
}

/// The 47 prefectures. Stored by romanized name, serialized by Japanese name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Prefecture {
    #[sea_orm(string_value = "hokkaido")]
    #[serde(rename = "北海道")]
    Hokkaido,
    #[sea_orm(string_value = "aomori")]
    #[serde(rename = "青森県")]
    Aomori,
    #[sea_orm(string_value = "iwate")]
    #[serde(rename = "岩手県")]
    Iwate,
    #[sea_orm(string_value = "miyagi")]
    #[serde(rename = "宮城県")]
    Miyagi,
    #[sea_orm(string_value = "akita")]
    #[serde(rename = "秋田県")]
    Akita,
    #[sea_orm(string_value = "yamagata")]
    #[serde(rename = "山形県")]
    Yamagata,
    #[sea_orm(string_value = "fukushima")]
    #[serde(rename = "福島県")]
    Fukushima,
    #[sea_orm(string_value = "ibaraki")]
    #[serde(rename = "茨城県")]
    Ibaraki,
    #[sea_orm(string_value = "tochigi")]
    #[serde(rename = "栃木県")]
    Tochigi,
    #[sea_orm(string_value = "gunma")]
    #[serde(rename = "群馬県")]
    Gunma,
    #[sea_orm(string_value = "saitama")]
    #[serde(rename = "埼玉県")]
    Saitama,
    #[sea_orm(string_value = "chiba")]
    #[serde(rename = "千葉県")]
    Chiba,
    #[sea_orm(string_value = "tokyo")]
    #[serde(rename = "東京都")]
    Tokyo,
    #[sea_orm(string_value = "kanagawa")]
    #[serde(rename = "神奈川県")]
    Kanagawa,
    #[sea_orm(string_value = "niigata")]
    #[serde(rename = "新潟県")]
    Niigata,
    #[sea_orm(string_value = "toyama")]
    #[serde(rename = "富山県")]
    Toyama,
    #[sea_orm(string_value = "ishikawa")]
    #[serde(rename = "石川県")]
    Ishikawa,
    #[sea_orm(string_value = "fukui")]
    #[serde(rename = "福井県")]
    Fukui,
    #[sea_orm(string_value = "yamanashi")]
    #[serde(rename = "山梨県")]
    Yamanashi,
    #[sea_orm(string_value = "nagano")]
    #[serde(rename = "長野県")]
    Nagano,
    #[sea_orm(string_value = "gifu")]
    #[serde(rename = "岐阜県")]
    Gifu,
    #[sea_orm(string_value = "shizuoka")]
    #[serde(rename = "静岡県")]
    Shizuoka,
    #[sea_orm(string_value = "aichi")]
    #[serde(rename = "愛知県")]
    Aichi,
    #[sea_orm(string_value = "mie")]
    #[serde(rename = "三重県")]
    Mie,
    #[sea_orm(string_value = "shiga")]
    #[serde(rename = "滋賀県")]
    Shiga,
    #[sea_orm(string_value = "kyoto")]
    #[serde(rename = "京都府")]
    Kyoto,
    #[sea_orm(string_value = "osaka")]
    #[serde(rename = "大阪府")]
    Osaka,
    #[sea_orm(string_value = "hyogo")]
    #[serde(rename = "兵庫県")]
    Hyogo,
    #[sea_orm(string_value = "nara")]
    #[serde(rename = "奈良県")]
    Nara,
    #[sea_orm(string_value = "wakayama")]
    #[serde(rename = "和歌山県")]
    Wakayama,
    #[sea_orm(string_value = "tottori")]
    #[serde(rename = "鳥取県")]
    Tottori,
    #[sea_orm(string_value = "shimane")]
    #[serde(rename = "島根県")]
    Shimane,
    #[sea_orm(string_value = "okayama")]
    #[serde(rename = "岡山県")]
    Okayama,
    #[sea_orm(string_value = "hiroshima")]
    #[serde(rename = "広島県")]
    Hiroshima,
    #[sea_orm(string_value = "yamaguchi")]
    #[serde(rename = "山口県")]
    Yamaguchi,
    #[sea_orm(string_value = "tokushima")]
    #[serde(rename = "徳島県")]
    Tokushima,
    #[sea_orm(string_value = "kagawa")]
    #[serde(rename = "香川県")]
    Kagawa,
    #[sea_orm(string_value = "ehime")]
    #[serde(rename = "愛媛県")]
    Ehime,
    #[sea_orm(string_value = "kochi")]
    #[serde(rename = "高知県")]
    Kochi,
    #[sea_orm(string_value = "fukuoka")]
    #[serde(rename = "福岡県")]
    Fukuoka,
    #[sea_orm(string_value = "saga")]
    #[serde(rename = "佐賀県")]
    Saga,
    #[sea_orm(string_value = "nagasaki")]
    #[serde(rename = "長崎県")]
    Nagasaki,
    #[sea_orm(string_value = "kumamoto")]
    #[serde(rename = "熊本県")]
    Kumamoto,
    #[sea_orm(string_value = "oita")]
    #[serde(rename = "大分県")]
    Oita,
    #[sea_orm(string_value = "miyazaki")]
    #[serde(rename = "宮崎県")]
    Miyazaki,
    #[sea_orm(string_value = "kagoshima")]
    #[serde(rename = "鹿児島県")]
    Kagoshima,
    #[sea_orm(string_value = "okinawa")]
    #[serde(rename = "沖縄県")]
    Okinawa,
}
