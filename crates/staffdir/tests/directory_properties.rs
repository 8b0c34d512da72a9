//! End-to-end checks of the directory through the application root, backed
//! by SQLite.

use std::sync::Arc;

use staffdir::employee::seed_employees;
use staffdir::form::Field;
use staffdir::list::total_pages;
use staffdir::router::{LIST_PATH, NEW_PATH};
use staffdir::storage::EMPLOYEES_KEY;
use staffdir::{App, Config, Directory, EmployeeId, KeyValueStore, Storage, ViewMode};

fn test_config(seed_count: usize) -> Config {
    let mut config = Config::default();
    config.storage.seed_count = seed_count;
    config.ui.load_delay_ms = 0;
    config
}

fn sqlite_store() -> Arc<dyn KeyValueStore> {
    Arc::new(Storage::open_in_memory().unwrap())
}

fn create_test_app(seed_count: usize) -> App {
    App::new(sqlite_store(), &test_config(seed_count)).unwrap()
}

async fn add(app: &mut App, phone: &str, email: &str) -> staffdir::Result<()> {
    app.navigate(NEW_PATH).await?;
    let form = app.form_mut().unwrap();
    form.set_field(Field::FirstName, "Deniz");
    form.set_field(Field::LastName, "Aksoy");
    form.set_field(Field::Phone, phone);
    form.set_field(Field::Email, email);
    form.set_field(Field::Department, "Tech");
    form.set_field(Field::Position, "Senior");
    form.submit()?;
    app.confirm_form().await?;
    Ok(())
}

#[test]
fn test_empty_store_yields_seed() {
    let app = create_test_app(25);
    assert_eq!(app.directory().load().unwrap(), seed_employees(25));
}

#[tokio::test]
async fn test_create_grows_by_one() {
    let mut app = create_test_app(10);
    add(&mut app, "5551112233", "deniz@aksoy.org").await.unwrap();

    let employees = app.directory().load().unwrap();
    assert_eq!(employees.len(), 11);
    assert_eq!(employees[10].id, EmployeeId::from(11));
    assert_eq!(employees[10].phone, "+905551112233");
}

#[tokio::test]
async fn test_duplicates_leave_collection_unchanged() {
    let mut app = create_test_app(10);
    let before = app.directory().load().unwrap();

    let err = add(&mut app, &before[4].phone, "new@aksoy.org").await.unwrap_err();
    assert!(err.is_duplicate());
    let err = add(&mut app, "5551112233", &before[4].email.to_uppercase())
        .await
        .unwrap_err();
    assert!(err.is_duplicate());

    assert_eq!(app.directory().load().unwrap(), before);
}

#[tokio::test]
async fn test_edit_keeps_length_and_updates_one() {
    let mut app = create_test_app(10);
    let before = app.directory().load().unwrap();

    app.navigate("/employees/6").await.unwrap();
    let form = app.form_mut().unwrap();
    form.set_field(Field::Position, "Senior");
    form.set_field(Field::FirstName, "Ilgaz");
    form.submit().unwrap();
    app.confirm_form().await.unwrap();

    let after = app.directory().load().unwrap();
    assert_eq!(after.len(), before.len());
    let changed: Vec<_> = before
        .iter()
        .zip(&after)
        .filter(|(b, a)| b != a)
        .map(|(_, a)| a.id.clone())
        .collect();
    assert_eq!(changed, vec![EmployeeId::from(6)]);
}

#[tokio::test]
async fn test_edit_then_cancel_leaves_record() {
    let mut app = create_test_app(10);
    let before = app.directory().find(&EmployeeId::from(3)).unwrap();

    app.navigate("/employees/3").await.unwrap();
    let form = app.form_mut().unwrap();
    form.set_field(Field::Email, "other@aksoy.org");
    form.submit().unwrap();
    form.cancel_confirm();
    app.cancel_form().await.unwrap();

    assert_eq!(app.router().current_path(), LIST_PATH);
    assert_eq!(app.directory().find(&EmployeeId::from(3)).unwrap(), before);
}

#[tokio::test]
async fn test_delete_removes_exactly_one_and_clamps_page() {
    let mut app = create_test_app(17);
    app.navigate(LIST_PATH).await.unwrap();

    let list = app.list_mut().unwrap();
    assert_eq!(list.last_page().unwrap(), 3);
    list.request_delete(&EmployeeId::from(17)).unwrap();
    app.confirm_list().await.unwrap();

    let employees = app.directory().load().unwrap();
    assert_eq!(employees.len(), 16);
    assert!(employees.iter().all(|e| e.id != EmployeeId::from(17)));

    let list = app.list_mut().unwrap();
    assert!(list.current_page() <= total_pages(16, list.page_size()));
    assert_eq!(list.current_page(), 2);
    assert_eq!(app.state().page_index().unwrap(), 2);
}

#[tokio::test]
async fn test_page_bound_holds_for_every_page() {
    let mut app = create_test_app(30);
    app.navigate(LIST_PATH).await.unwrap();
    let list = app.list_mut().unwrap();
    list.set_view(ViewMode::Cards).unwrap();
    list.set_search("kaya").unwrap();

    for page in 0..=12 {
        list.go_to_page(page).unwrap();
        let filtered = list.filtered().len();
        assert!(list.current_page() * list.page_size() <= filtered + list.page_size());
        assert!(list.page_items().len() <= list.page_size());
    }
}

#[tokio::test]
async fn test_preferences_survive_restart() {
    let store = sqlite_store();
    let config = test_config(12);

    let mut app = App::new(store.clone(), &config).unwrap();
    app.navigate(LIST_PATH).await.unwrap();
    let list = app.list_mut().unwrap();
    list.set_view(ViewMode::Cards).unwrap();
    list.go_to_page(3).unwrap();
    app.toggle_lang().unwrap();

    let mut app = App::new(store, &config).unwrap();
    app.navigate(LIST_PATH).await.unwrap();
    let list = app.list_mut().unwrap();
    assert_eq!(list.view(), ViewMode::Cards);
    assert_eq!(list.current_page(), 3);
    assert_eq!(app.messages().unwrap().get("save"), "Kaydet");
}

#[test]
fn test_file_store_round_trip() {
    let path = std::env::temp_dir().join(format!("staffdir-test-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let employees = seed_employees(40);
    {
        let store = Arc::new(Storage::open(&path).unwrap());
        Directory::new(store, 0).save(&employees).unwrap();
    }
    let store = Arc::new(Storage::open(&path).unwrap());
    assert!(store.get(EMPLOYEES_KEY).unwrap().is_some());
    assert_eq!(Directory::new(store, 0).load().unwrap(), employees);

    let _ = std::fs::remove_file(&path);
}
