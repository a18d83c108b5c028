use chrono::Duration;
use shared::{DeviceCategory, DeviceId, DeviceStatus};

use super::common::{epoch, new_device};
use crate::error::ManagerError;
use crate::services::InMemoryDeviceCatalog;
use crate::traits::DeviceCatalog;

#[tokio::test]
async fn test_new_devices_start_inactive() {
    let catalog = InMemoryDeviceCatalog::new();
    let device = catalog
        .create(new_device("Gate", "10.0.0.1", DeviceCategory::AccessController), epoch())
        .await
        .unwrap();

    assert_eq!(device.status, DeviceStatus::Inactive);
    assert_eq!(device.created_at, epoch());
    assert_eq!(catalog.get(device.id).await.unwrap(), device);
}

#[tokio::test]
async fn test_duplicate_ip_is_a_conflict() {
    let catalog = InMemoryDeviceCatalog::new();
    catalog
        .create(new_device("A", "10.0.0.1", DeviceCategory::Anpr), epoch())
        .await
        .unwrap();

    let result = catalog
        .create(new_device("B", "10.0.0.1", DeviceCategory::FaceReader), epoch())
        .await;
    assert!(matches!(result, Err(ManagerError::Conflict { .. })));
    assert_eq!(catalog.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_device_is_not_found() {
    let catalog = InMemoryDeviceCatalog::new();
    let missing = DeviceId::new();

    assert!(matches!(catalog.get(missing).await, Err(ManagerError::NotFound { device_id }) if device_id == missing));
    let update = catalog.update_status(missing, DeviceStatus::Active, epoch()).await;
    assert!(update.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_update_status_touches_updated_at() {
    let catalog = InMemoryDeviceCatalog::new();
    let device = catalog
        .create(new_device("Cam", "10.0.0.2", DeviceCategory::FaceReader), epoch())
        .await
        .unwrap();

    let later = epoch() + Duration::seconds(30);
    let updated = catalog.update_status(device.id, DeviceStatus::Active, later).await.unwrap();
    assert_eq!(updated.status, DeviceStatus::Active);
    assert_eq!(updated.updated_at, later);
    assert_eq!(updated.created_at, epoch());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let catalog = InMemoryDeviceCatalog::new();
    let first = catalog
        .create(new_device("1", "10.0.0.1", DeviceCategory::Anpr), epoch())
        .await
        .unwrap();
    let second = catalog
        .create(new_device("2", "10.0.0.2", DeviceCategory::Anpr), epoch())
        .await
        .unwrap();

    let ids: Vec<DeviceId> = catalog.list().await.unwrap().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}
