use mercari_core::db::open_db_in_memory;
use mercari_core::{
    content_file_name, CatalogRepository, CatalogService, ImageStore, ItemValidationError,
    ServiceError, SqliteCatalogRepository, SubmitItemRequest,
};

fn request(name: &str, category: &str, image: Option<&[u8]>) -> SubmitItemRequest {
    SubmitItemRequest {
        name: name.to_string(),
        category: category.to_string(),
        image: image.map(<[u8]>::to_vec),
    }
}

#[test]
fn submit_with_image_stores_file_and_links_item() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let service = CatalogService::new(
        SqliteCatalogRepository::new(&conn),
        ImageStore::open(dir.path()).unwrap(),
    );

    let receipt = service
        .submit_item(request("Bike", "Sports", Some(b"bike photo".as_slice())))
        .unwrap();

    assert_eq!(receipt.message, "Item received: Bike");
    assert_eq!(receipt.name, "Bike");
    let expected_image = content_file_name(b"bike photo");
    assert_eq!(receipt.image_name.as_deref(), Some(expected_image.as_str()));

    let item = service.get_item(receipt.item_id).unwrap();
    assert_eq!(item.category, "Sports");
    assert_eq!(item.image_name.as_deref(), Some(expected_image.as_str()));
    assert_eq!(service.fetch_image(&expected_image).unwrap(), b"bike photo");
}

#[test]
fn submit_without_image_leaves_image_name_empty() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let service = CatalogService::new(
        SqliteCatalogRepository::new(&conn),
        ImageStore::open(dir.path()).unwrap(),
    );

    let receipt = service.submit_item(request("Lamp", "Home", None)).unwrap();

    assert_eq!(receipt.image_name, None);
    assert_eq!(service.get_item(receipt.item_id).unwrap().image_name, None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn rejected_submission_writes_neither_image_nor_rows() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteCatalogRepository::new(&conn);
    let service = CatalogService::new(repo, ImageStore::open(dir.path()).unwrap());

    let err = service
        .submit_item(request("  ", "toys", Some(b"orphan image".as_slice())))
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Validation(ItemValidationError::EmptyName)
    ));
    assert!(err.is_validation());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(service.list_items().unwrap().is_empty());
    assert!(SqliteCatalogRepository::new(&conn)
        .list_categories()
        .unwrap()
        .is_empty());
}

#[test]
fn empty_image_upload_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let service = CatalogService::new(
        SqliteCatalogRepository::new(&conn),
        ImageStore::open(dir.path()).unwrap(),
    );

    let err = service
        .submit_item(request("Bike", "Sports", Some(b"".as_slice())))
        .unwrap_err();

    assert!(err.is_validation());
    assert!(service.list_items().unwrap().is_empty());
}

#[test]
fn resubmitting_same_image_reuses_file() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let service = CatalogService::new(
        SqliteCatalogRepository::new(&conn),
        ImageStore::open(dir.path()).unwrap(),
    );

    let first = service
        .submit_item(request("Bike", "Sports", Some(b"shared".as_slice())))
        .unwrap();
    let second = service
        .submit_item(request("Bike (2)", "Sports", Some(b"shared".as_slice())))
        .unwrap();

    assert_ne!(first.item_id, second.item_id);
    assert_eq!(first.image_name, second.image_name);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn reads_surface_not_found_for_unknown_targets() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let service = CatalogService::new(
        SqliteCatalogRepository::new(&conn),
        ImageStore::open(dir.path()).unwrap(),
    );

    assert!(service.get_item(7).unwrap_err().is_not_found());
    assert!(service
        .fetch_image(&content_file_name(b"missing"))
        .unwrap_err()
        .is_not_found());
    assert!(service.image_path("nope.jpg").unwrap_err().is_not_found());
}

#[test]
fn search_and_list_go_through_service() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let service = CatalogService::new(
        SqliteCatalogRepository::new(&conn),
        ImageStore::open(dir.path()).unwrap(),
    );
    service.submit_item(request("Bike", "Sports", None)).unwrap();
    service.submit_item(request("Mug", "Kitchen", None)).unwrap();

    assert_eq!(service.list_items().unwrap().len(), 2);
    let hits = service.search_items("bik").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Bike");
    assert!(service.search_items("zzz").unwrap().is_empty());
}
