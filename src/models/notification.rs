use crate::entities::notification;
use crate::entities::sea_orm_active_enums::NotificationType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub link_url: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        NotificationResponse {
            id: n.id,
            notification_type: n.notification_type,
            title: n.title,
            message: n.message,
            link_url: n.link_url,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}
