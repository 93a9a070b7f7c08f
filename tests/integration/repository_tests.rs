//! Repository invariants, exercised through units of work

use uuid::Uuid;

use library_server::{error::AppError, repository::Repository};

use crate::common::{author, book, date, repository};

async fn add_author(repo: &Repository, first: &str, last: &str) -> Uuid {
    let mut uow = repo.begin().await.unwrap();
    let id = uow
        .authors()
        .add(&author(first, last, date(1970, 1, 1), "Adventure"))
        .await
        .unwrap();
    uow.complete().await.unwrap();
    id
}

#[tokio::test]
async fn test_add_then_get_returns_same_fields() {
    let repo = repository().await;
    let john = author("John", "Smith", date(1970, 1, 1), "Adventure");

    let mut uow = repo.begin().await.unwrap();
    let id = uow.authors().add(&john).await.unwrap();
    uow.complete().await.unwrap();
    assert_eq!(id, john.id);

    let mut uow = repo.begin().await.unwrap();
    let stored = uow.authors().get(id).await.unwrap();
    assert_eq!(stored, john);
}

#[tokio::test]
async fn test_add_duplicate_triple_fails_regardless_of_genre() {
    let repo = repository().await;
    add_author(&repo, "John", "Smith").await;

    let mut uow = repo.begin().await.unwrap();
    let result = uow
        .authors()
        .add(&author("John", "Smith", date(1970, 1, 1), "Horror"))
        .await;
    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_add_with_taken_identity_fails() {
    let repo = repository().await;
    let id = add_author(&repo, "John", "Smith").await;

    let mut other = author("Jane", "Doe", date(1980, 5, 5), "Poetry");
    other.id = id;
    let mut uow = repo.begin().await.unwrap();
    let result = uow.authors().add(&other).await;
    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_add_with_repeated_book_titles_fails() {
    let repo = repository().await;
    let mut john = author("John", "Smith", date(1970, 1, 1), "Adventure");
    john.books = vec![book(john.id, "It", "one"), book(john.id, "It", "two")];

    let mut uow = repo.begin().await.unwrap();
    let result = uow.authors().add(&john).await;
    assert!(matches!(result, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_get_missing_author_fails() {
    let repo = repository().await;
    let mut uow = repo.begin().await.unwrap();
    let result = uow.authors().get(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_list_on_empty_catalog_fails_every_time() {
    let repo = repository().await;
    let mut uow = repo.begin().await.unwrap();
    assert!(matches!(uow.authors().list().await, Err(AppError::NotFound(_))));
    assert!(matches!(uow.authors().list().await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_list_orders_by_first_then_last_name() {
    let repo = repository().await;
    add_author(&repo, "Stephen", "King").await;
    add_author(&repo, "Anne", "Rice").await;
    add_author(&repo, "Anne", "Bishop").await;

    let mut uow = repo.begin().await.unwrap();
    let names: Vec<(String, String)> = uow
        .authors()
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|a| (a.first_name, a.last_name))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Anne".to_string(), "Bishop".to_string()),
            ("Anne".to_string(), "Rice".to_string()),
            ("Stephen".to_string(), "King".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_list_by_ids_filters_and_tolerates_misses() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;
    add_author(&repo, "Anne", "Rice").await;
    let bishop = add_author(&repo, "Anne", "Bishop").await;

    let mut uow = repo.begin().await.unwrap();
    let found = uow
        .authors()
        .list_by_ids(&[king, bishop, Uuid::new_v4()])
        .await
        .unwrap();
    let ids: Vec<Uuid> = found.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![bishop, king]);

    assert!(uow.authors().list_by_ids(&[]).await.unwrap().is_empty());
    assert!(uow
        .authors()
        .list_by_ids(&[Uuid::new_v4()])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_author() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;
    let rice = add_author(&repo, "Anne", "Rice").await;

    let mut uow = repo.begin().await.unwrap();
    assert!(matches!(
        uow.authors().delete(Uuid::new_v4()).await,
        Err(AppError::NotFound(_))
    ));
    uow.authors().delete(king).await.unwrap();
    uow.complete().await.unwrap();

    let mut uow = repo.begin().await.unwrap();
    let remaining: Vec<Uuid> = uow
        .authors()
        .list()
        .await
        .unwrap()
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(remaining, vec![rice]);
    assert!(!uow.authors().exists(king).await.unwrap());
}

#[tokio::test]
async fn test_delete_author_cascades_to_books() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;

    let mut uow = repo.begin().await.unwrap();
    let it = uow
        .books()
        .add_for_author(king, &book(king, "It", "Scary book"))
        .await
        .unwrap();
    uow.authors().delete(king).await.unwrap();
    uow.complete().await.unwrap();

    let mut uow = repo.begin().await.unwrap();
    assert!(!uow.books().exists(it).await.unwrap());
}

#[tokio::test]
async fn test_update_overwrites_fields_in_place() {
    let repo = repository().await;
    let id = add_author(&repo, "John", "Smith").await;

    let mut changed = author("Johnny", "Smith", date(1971, 2, 2), "Thriller");
    changed.id = id;
    changed.books = vec![book(id, "Fresh", "new collection")];

    let mut uow = repo.begin().await.unwrap();
    uow.authors().update(&changed).await.unwrap();
    uow.complete().await.unwrap();

    let mut uow = repo.begin().await.unwrap();
    let stored = uow.authors().get(id).await.unwrap();
    assert_eq!(stored, changed);
}

#[tokio::test]
async fn test_update_to_another_authors_triple_cannot_change_identity() {
    let repo = repository().await;
    add_author(&repo, "John", "Smith").await;
    let jane = add_author(&repo, "Jane", "Doe").await;

    let mut clash = author("John", "Smith", date(1970, 1, 1), "Poetry");
    clash.id = jane;
    let mut uow = repo.begin().await.unwrap();
    let result = uow.authors().update(&clash).await;
    assert!(matches!(result, Err(AppError::CannotChangeIdentity(_))));

    // Unknown identity carrying an existing triple
    let stranger = author("John", "Smith", date(1970, 1, 1), "Poetry");
    let result = uow.authors().update(&stranger).await;
    assert!(matches!(result, Err(AppError::CannotChangeIdentity(_))));
}

#[tokio::test]
async fn test_update_unknown_author_fails() {
    let repo = repository().await;
    add_author(&repo, "John", "Smith").await;

    let mut uow = repo.begin().await.unwrap();
    let result = uow
        .authors()
        .update(&author("Nobody", "Known", date(1990, 1, 1), "None"))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_add_book_for_author() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;

    let mut uow = repo.begin().await.unwrap();
    assert!(matches!(
        uow.books()
            .add_for_author(Uuid::new_v4(), &book(king, "It", "Scary book"))
            .await,
        Err(AppError::NotFound(_))
    ));

    uow.books()
        .add_for_author(king, &book(king, "It", "Scary book"))
        .await
        .unwrap();
    assert!(matches!(
        uow.books()
            .add_for_author(king, &book(king, "It", "different"))
            .await,
        Err(AppError::AlreadyExists(_))
    ));

    // Title comparison is case-sensitive
    uow.books()
        .add_for_author(king, &book(king, "it", "lowercase"))
        .await
        .unwrap();
    uow.complete().await.unwrap();

    let mut uow = repo.begin().await.unwrap();
    let titles: Vec<String> = uow
        .books()
        .list_for_author(king)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["It".to_string(), "it".to_string()]);
}

#[tokio::test]
async fn test_same_title_allowed_for_different_authors() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;
    let rice = add_author(&repo, "Anne", "Rice").await;

    let mut uow = repo.begin().await.unwrap();
    uow.books()
        .add_for_author(king, &book(king, "It", "Scary book"))
        .await
        .unwrap();
    uow.books()
        .add_for_author(rice, &book(rice, "It", "Another"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_book_for_author_is_scoped() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;
    let rice = add_author(&repo, "Anne", "Rice").await;

    let mut uow = repo.begin().await.unwrap();
    let it = uow
        .books()
        .add_for_author(king, &book(king, "It", "Scary book"))
        .await
        .unwrap();

    let found = uow.books().get_for_author(king, it).await.unwrap();
    assert_eq!(found.title, "It");
    assert!(matches!(
        uow.books().get_for_author(rice, it).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        uow.books().get_for_author(Uuid::new_v4(), it).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_books_of_author_without_books_fails() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;

    let mut uow = repo.begin().await.unwrap();
    assert!(matches!(
        uow.books().list_for_author(king).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        uow.books().list_for_author(Uuid::new_v4()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_book_for_author() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;

    let mut uow = repo.begin().await.unwrap();
    let it = uow
        .books()
        .add_for_author(king, &book(king, "It", "Scary book"))
        .await
        .unwrap();
    uow.books()
        .add_for_author(king, &book(king, "Carrie", "Prom night"))
        .await
        .unwrap();

    // Same title as "It" under a different identity
    let impostor = book(king, "It", "changed identity");
    assert!(matches!(
        uow.books().update_for_author(king, &impostor).await,
        Err(AppError::CannotChangeIdentity(_))
    ));

    // Renaming "It" to a title already used by "Carrie"
    let mut clash = book(king, "Carrie", "clash");
    clash.id = it;
    assert!(matches!(
        uow.books().update_for_author(king, &clash).await,
        Err(AppError::CannotChangeIdentity(_))
    ));

    assert!(matches!(
        uow.books()
            .update_for_author(king, &book(king, "Unknown", "nothing matches"))
            .await,
        Err(AppError::NotFound(_))
    ));

    let missing_author = Uuid::new_v4();
    let mut orphan = book(missing_author, "It", "no such author");
    orphan.id = it;
    assert!(matches!(
        uow.books().update_for_author(missing_author, &orphan).await,
        Err(AppError::NotFound(_))
    ));

    let mut renamed = book(king, "It (1986)", "Scarier book");
    renamed.id = it;
    uow.books().update_for_author(king, &renamed).await.unwrap();
    let stored = uow.books().get_for_author(king, it).await.unwrap();
    assert_eq!(stored, renamed);
}

#[tokio::test]
async fn test_delete_book() {
    let repo = repository().await;
    let king = add_author(&repo, "Stephen", "King").await;

    let mut uow = repo.begin().await.unwrap();
    let it = uow
        .books()
        .add_for_author(king, &book(king, "It", "Scary book"))
        .await
        .unwrap();
    assert!(matches!(
        uow.books().delete(Uuid::new_v4()).await,
        Err(AppError::NotFound(_))
    ));
    uow.books().delete(it).await.unwrap();
    assert!(!uow.books().exists(it).await.unwrap());
    assert!(uow.authors().exists(king).await.unwrap());
}

#[tokio::test]
async fn test_dropped_unit_of_work_rolls_back() {
    let repo = repository().await;
    let john = author("John", "Smith", date(1970, 1, 1), "Adventure");

    {
        let mut uow = repo.begin().await.unwrap();
        uow.authors().add(&john).await.unwrap();
        assert!(uow.authors().exists(john.id).await.unwrap());
    }

    let mut uow = repo.begin().await.unwrap();
    assert!(!uow.authors().exists(john.id).await.unwrap());
}

#[tokio::test]
async fn test_unit_of_work_commits_authors_and_books_together() {
    let repo = repository().await;
    let john = author("John", "Smith", date(1970, 1, 1), "Adventure");

    let mut uow = repo.begin().await.unwrap();
    uow.authors().add(&john).await.unwrap();
    let it = uow
        .books()
        .add_for_author(john.id, &book(john.id, "It", "Scary book"))
        .await
        .unwrap();
    uow.complete().await.unwrap();

    let mut uow = repo.begin().await.unwrap();
    let stored = uow.authors().get(john.id).await.unwrap();
    assert_eq!(stored.books.len(), 1);
    assert_eq!(stored.books[0].id, it);
}
