use super::articles::ArticleStore;
use super::comments::CommentStore;
use super::favorites::FavoriteStore;
use super::follows::FollowGraphStore;
use super::tags::TagStore;
use super::users::UserStore;
use crate::db::Db;
use quill_core::{
    ArticleFilter, Email, Limit, NewArticle, NewUser, Offset, Slug, TagName, UserId, Username,
};
use std::time::Duration;

struct Stores {
    db: Db,
    users: UserStore,
    tags: TagStore,
    follows: FollowGraphStore,
    favorites: FavoriteStore,
    articles: ArticleStore,
    comments: CommentStore,
}

async fn stores() -> Stores {
    let db = Db::in_memory().await.unwrap();
    super::migrations::run(&db).await.unwrap();
    let tags = TagStore::new(db.clone());
    Stores {
        users: UserStore::new(db.clone()),
        follows: FollowGraphStore::new(db.clone()),
        favorites: FavoriteStore::new(db.clone()),
        articles: ArticleStore::new(db.clone(), tags.clone()),
        comments: CommentStore::new(db.clone()),
        tags,
        db,
    }
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        username: Username::new(name).unwrap(),
        email: Email::new(format!("{name}@example.com")).unwrap(),
        password_hash: "hashed".into(),
    }
}

async fn seed_user(s: &Stores, name: &str) -> UserId {
    let mut tx = s.db.begin().await.unwrap();
    let id = s.users.insert(&mut tx, &new_user(name)).await.unwrap();
    tx.commit().await.unwrap();
    id
}

fn tag_names(raw: &[&str]) -> Vec<TagName> {
    raw.iter().map(|t| TagName::new(*t).unwrap()).collect()
}

fn new_article(title: &str, tags: &[&str]) -> NewArticle {
    NewArticle {
        title: title.into(),
        description: format!("about {title}"),
        body: format!("body of {title}"),
        tag_list: tag_names(tags),
    }
}

async fn seed_article(s: &Stores, author: &UserId, title: &str, tags: &[&str]) -> Slug {
    let article = new_article(title, tags);
    let mut ids = Vec::new();
    for tag in &article.tag_list {
        ids.push(s.tags.get_or_create(tag).await.unwrap());
    }
    let mut tx = s.db.begin().await.unwrap();
    let slug = s.articles.insert(&mut tx, &article, author).await.unwrap();
    s.tags.link(&mut tx, &slug, &ids).await.unwrap();
    tx.commit().await.unwrap();
    slug
}

// ── Tags ────────────────────────────────────────────────────────────

#[tokio::test]
async fn tag_get_or_create_returns_same_id() {
    let s = stores().await;
    let rust = TagName::new("rust").unwrap();

    let first = s.tags.get_or_create(&rust).await.unwrap();
    let second = s.tags.get_or_create(&rust).await.unwrap();
    assert_eq!(first, second);

    let all = s.tags.all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, rust);
}

#[tokio::test]
async fn tag_get_or_create_survives_concurrent_callers() {
    let s = stores().await;
    let rust = TagName::new("rust").unwrap();

    let (a, b, c, d) = tokio::join!(
        s.tags.get_or_create(&rust),
        s.tags.get_or_create(&rust),
        s.tags.get_or_create(&rust),
        s.tags.get_or_create(&rust),
    );
    let a = a.unwrap();
    assert_eq!(a, b.unwrap());
    assert_eq!(a, c.unwrap());
    assert_eq!(a, d.unwrap());
    assert_eq!(s.tags.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn tags_attach_to_article_without_duplicates() {
    let s = stores().await;
    let author = seed_user(&s, "ann").await;
    let slug = seed_article(&s, &author, "tagged", &["go", "rust"]).await;

    let mut tags = s.tags.for_article(&slug).await.unwrap();
    tags.sort();
    assert_eq!(tags, tag_names(&["go", "rust"]));

    // Linking again is a no-op
    let go = s.tags.get_or_create(&TagName::new("go").unwrap()).await.unwrap();
    let mut tx = s.db.begin().await.unwrap();
    s.tags.link(&mut tx, &slug, &[go]).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(s.tags.for_article(&slug).await.unwrap().len(), 2);
}

#[tokio::test]
async fn tags_are_global_across_articles() {
    let s = stores().await;
    let author = seed_user(&s, "ann").await;
    seed_article(&s, &author, "first", &["python"]).await;
    seed_article(&s, &author, "second", &["python"]).await;

    assert_eq!(s.tags.all().await.unwrap().len(), 1);
}

// ── Follow graph ────────────────────────────────────────────────────

#[tokio::test]
async fn follow_is_idempotent() {
    let s = stores().await;
    let a = seed_user(&s, "a").await;
    let b = seed_user(&s, "b").await;

    assert!(!s.follows.is_following(&a, &b).await.unwrap());
    s.follows.follow(&a, &b).await.unwrap();
    s.follows.follow(&a, &b).await.unwrap();
    assert!(s.follows.is_following(&a, &b).await.unwrap());
    // Directed: b does not follow a
    assert!(!s.follows.is_following(&b, &a).await.unwrap());

    s.follows.unfollow(&a, &b).await.unwrap();
    s.follows.unfollow(&a, &b).await.unwrap();
    assert!(!s.follows.is_following(&a, &b).await.unwrap());
}

// ── Favorites ───────────────────────────────────────────────────────

#[tokio::test]
async fn favorite_is_idempotent() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let reader = seed_user(&s, "reader").await;
    let slug = seed_article(&s, &author, "liked", &[]).await;

    s.favorites.favorite(&slug, &reader).await.unwrap();
    s.favorites.favorite(&slug, &reader).await.unwrap();
    assert_eq!(s.favorites.count(&slug).await.unwrap(), 1);
    assert!(s.favorites.is_favorited(&slug, &reader).await.unwrap());

    s.favorites.unfavorite(&slug, &reader).await.unwrap();
    s.favorites.unfavorite(&slug, &reader).await.unwrap();
    assert_eq!(s.favorites.count(&slug).await.unwrap(), 0);
    assert!(!s.favorites.is_favorited(&slug, &reader).await.unwrap());
}

#[tokio::test]
async fn unfavorite_leaves_other_users_untouched() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let first = seed_user(&s, "first").await;
    let second = seed_user(&s, "second").await;
    let slug = seed_article(&s, &author, "popular", &[]).await;

    s.favorites.favorite(&slug, &first).await.unwrap();
    s.favorites.favorite(&slug, &second).await.unwrap();
    s.favorites.unfavorite(&slug, &first).await.unwrap();

    assert_eq!(s.favorites.count(&slug).await.unwrap(), 1);
    assert!(s.favorites.is_favorited(&slug, &second).await.unwrap());
}

// ── Article find / update / delete ──────────────────────────────────

#[tokio::test]
async fn find_composes_the_full_view() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let reader = seed_user(&s, "reader").await;
    let slug = seed_article(&s, &author, "composed", &["a", "b"]).await;

    s.favorites.favorite(&slug, &reader).await.unwrap();
    s.follows.follow(&reader, &author).await.unwrap();

    let seen = s.articles.find(&slug, Some(&reader)).await.unwrap().unwrap();
    assert_eq!(seen.slug, slug);
    assert_eq!(seen.title, "composed");
    assert_eq!(seen.favorites_count, 1);
    assert!(seen.favorited);
    assert_eq!(seen.author.username.as_str(), "author");
    assert!(seen.author.following);
    let mut tags = seen.tag_list.clone();
    tags.sort();
    assert_eq!(tags, tag_names(&["a", "b"]));
    assert!(seen.updated_at >= seen.created_at);

    // Anonymous viewer: same counters, no flags
    let anon = s.articles.find(&slug, None).await.unwrap().unwrap();
    assert_eq!(anon.favorites_count, 1);
    assert!(!anon.favorited);
    assert!(!anon.author.following);
}

#[tokio::test]
async fn find_missing_slug_is_absent_not_error() {
    let s = stores().await;
    assert!(s.articles.find(&Slug::generate(), None).await.unwrap().is_none());
}

#[tokio::test]
async fn update_applies_only_present_fields() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let slug = seed_article(&s, &author, "draft", &[]).await;
    let before = s.articles.find(&slug, None).await.unwrap().unwrap();

    let patch = quill_core::ArticleUpdate {
        title: Some("final".into()),
        ..Default::default()
    };
    let mut tx = s.db.begin().await.unwrap();
    let rows = s.articles.update(&mut tx, &slug, &patch).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(rows, 1);

    let after = s.articles.find(&slug, None).await.unwrap().unwrap();
    assert_eq!(after.title, "final");
    assert_eq!(after.description, before.description);
    assert_eq!(after.body, before.body);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn update_missing_slug_affects_no_rows() {
    let s = stores().await;
    let patch = quill_core::ArticleUpdate::default();
    let mut tx = s.db.begin().await.unwrap();
    let rows = s.articles.update(&mut tx, &Slug::generate(), &patch).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn is_same_author_is_tri_state() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let other = seed_user(&s, "other").await;
    let slug = seed_article(&s, &author, "mine", &[]).await;

    assert_eq!(s.articles.is_same_author(&slug, &author).await.unwrap(), Some(true));
    assert_eq!(s.articles.is_same_author(&slug, &other).await.unwrap(), Some(false));
    assert_eq!(
        s.articles.is_same_author(&Slug::generate(), &author).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn delete_cascades_to_joined_rows() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let reader = seed_user(&s, "reader").await;
    let slug = seed_article(&s, &author, "doomed", &["keep"]).await;
    s.favorites.favorite(&slug, &reader).await.unwrap();
    s.comments.add(&slug, &reader, "nice").await.unwrap();

    assert_eq!(s.articles.delete(&slug).await.unwrap(), 1);

    assert!(s.articles.find(&slug, None).await.unwrap().is_none());
    assert!(s.tags.for_article(&slug).await.unwrap().is_empty());
    assert_eq!(s.favorites.count(&slug).await.unwrap(), 0);
    assert!(s.comments.list_for_article(&slug, None).await.unwrap().is_empty());
    // Tags are global and survive the article
    assert_eq!(s.tags.all().await.unwrap().len(), 1);
}

// ── Listing composition ─────────────────────────────────────────────

async fn seed_go_rust_fixture(s: &Stores) -> (UserId, UserId, Slug, Slug, Slug) {
    let ann = seed_user(s, "ann").await;
    let ben = seed_user(s, "ben").await;
    let only_go = seed_article(s, &ann, "only go", &["go"]).await;
    let only_rust = seed_article(s, &ann, "only rust", &["rust"]).await;
    let both = seed_article(s, &ben, "both", &["go", "rust"]).await;
    (ann, ben, only_go, only_rust, both)
}

fn slugs(articles: &[quill_core::Article]) -> Vec<Slug> {
    articles.iter().map(|a| a.slug).collect()
}

#[tokio::test]
async fn list_filters_by_tag() {
    let s = stores().await;
    let (_, _, only_go, _, both) = seed_go_rust_fixture(&s).await;

    let filter = ArticleFilter {
        tag: Some(TagName::new("go").unwrap()),
        ..Default::default()
    };
    let found = s
        .articles
        .list(&filter, None, Limit::default(), Offset::default())
        .await
        .unwrap();

    let mut got = slugs(&found);
    got.sort();
    let mut want = vec![only_go, both];
    want.sort();
    assert_eq!(got, want);
}

#[tokio::test]
async fn list_ands_tag_and_author() {
    let s = stores().await;
    let (_, _, _, _, both) = seed_go_rust_fixture(&s).await;

    let filter = ArticleFilter {
        tag: Some(TagName::new("go").unwrap()),
        author: Some(Username::new("ben").unwrap()),
        ..Default::default()
    };
    let found = s
        .articles
        .list(&filter, None, Limit::default(), Offset::default())
        .await
        .unwrap();

    assert_eq!(slugs(&found), vec![both]);
}

#[tokio::test]
async fn list_filters_by_favoriter() {
    let s = stores().await;
    let (_, ben, only_go, _, _) = seed_go_rust_fixture(&s).await;
    s.favorites.favorite(&only_go, &ben).await.unwrap();

    let filter = ArticleFilter {
        favorited_by: Some(Username::new("ben").unwrap()),
        ..Default::default()
    };
    let found = s
        .articles
        .list(&filter, None, Limit::default(), Offset::default())
        .await
        .unwrap();

    assert_eq!(slugs(&found), vec![only_go]);
    assert_eq!(found[0].favorites_count, 1);
}

#[tokio::test]
async fn list_with_unknown_identities_is_empty_success() {
    let s = stores().await;
    seed_go_rust_fixture(&s).await;

    for filter in [
        ArticleFilter {
            tag: Some(TagName::new("cobol").unwrap()),
            ..Default::default()
        },
        ArticleFilter {
            author: Some(Username::new("nobody").unwrap()),
            ..Default::default()
        },
        ArticleFilter {
            favorited_by: Some(Username::new("nobody").unwrap()),
            ..Default::default()
        },
    ] {
        let found = s
            .articles
            .list(&filter, None, Limit::default(), Offset::default())
            .await
            .unwrap();
        assert!(found.is_empty(), "filter {filter:?} should match nothing");
    }
}

#[tokio::test]
async fn list_orders_newest_first() {
    let s = stores().await;
    let ann = seed_user(&s, "ann").await;
    let oldest = seed_article(&s, &ann, "oldest", &[]).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let middle = seed_article(&s, &ann, "middle", &[]).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newest = seed_article(&s, &ann, "newest", &[]).await;

    let found = s
        .articles
        .list(&ArticleFilter::default(), None, Limit::default(), Offset::default())
        .await
        .unwrap();

    assert_eq!(slugs(&found), vec![newest, middle, oldest]);
}

#[tokio::test]
async fn pagination_partitions_without_overlap() {
    let s = stores().await;
    let ann = seed_user(&s, "ann").await;
    for i in 0..5 {
        seed_article(&s, &ann, &format!("article {i}"), &[]).await;
    }

    let everything = s
        .articles
        .list(&ArticleFilter::default(), None, Limit::default(), Offset::default())
        .await
        .unwrap();
    assert_eq!(everything.len(), 5);

    let limit = Limit::new(2).unwrap();
    let mut paged = Vec::new();
    for start in [0, 2, 4] {
        let page = s
            .articles
            .list(
                &ArticleFilter::default(),
                None,
                limit,
                Offset::new(start).unwrap(),
            )
            .await
            .unwrap();
        assert!(page.len() <= 2);
        paged.extend(slugs(&page));
    }

    assert_eq!(paged, slugs(&everything));
}

// ── Feed ────────────────────────────────────────────────────────────

#[tokio::test]
async fn feed_contains_followed_authors_only() {
    let s = stores().await;
    let viewer = seed_user(&s, "viewer").await;
    let followed = seed_user(&s, "followed").await;
    let ignored = seed_user(&s, "ignored").await;
    s.follows.follow(&viewer, &followed).await.unwrap();

    let wanted = seed_article(&s, &followed, "wanted", &[]).await;
    seed_article(&s, &ignored, "unwanted", &[]).await;

    let feed = s
        .articles
        .feed(&viewer, Limit::default(), Offset::default())
        .await
        .unwrap();

    assert_eq!(slugs(&feed), vec![wanted]);
    assert!(feed[0].author.following);
}

#[tokio::test]
async fn feed_orders_newest_first_and_paginates() {
    let s = stores().await;
    let viewer = seed_user(&s, "viewer").await;
    let author = seed_user(&s, "author").await;
    s.follows.follow(&viewer, &author).await.unwrap();

    let first = seed_article(&s, &author, "first", &[]).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = seed_article(&s, &author, "second", &[]).await;

    let feed = s
        .articles
        .feed(&viewer, Limit::default(), Offset::default())
        .await
        .unwrap();
    assert_eq!(slugs(&feed), vec![second, first]);

    let tail = s
        .articles
        .feed(&viewer, Limit::new(1).unwrap(), Offset::new(1).unwrap())
        .await
        .unwrap();
    assert_eq!(slugs(&tail), vec![first]);
}

// ── Comments ────────────────────────────────────────────────────────

#[tokio::test]
async fn comments_list_most_recent_first() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let reader = seed_user(&s, "reader").await;
    let slug = seed_article(&s, &author, "discussed", &[]).await;

    let first = s.comments.add(&slug, &reader, "first").await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = s.comments.add(&slug, &reader, "second").await.unwrap();

    let listed = s.comments.list_for_article(&slug, None).await.unwrap();
    assert_eq!(
        listed.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![second.id, first.id]
    );
    assert_eq!(listed[0].body, "second");
    assert_eq!(listed[0].author.username.as_str(), "reader");
}

#[tokio::test]
async fn comment_same_author_is_tri_state() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let other = seed_user(&s, "other").await;
    let slug = seed_article(&s, &author, "discussed", &[]).await;
    let comment = s.comments.add(&slug, &author, "hello").await.unwrap();

    assert_eq!(s.comments.same_author(comment.id, &author).await.unwrap(), Some(true));
    assert_eq!(s.comments.same_author(comment.id, &other).await.unwrap(), Some(false));
    assert_eq!(
        s.comments.same_author(quill_core::CommentId::from(9999), &author).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn comment_delete_is_scoped_to_its_article() {
    let s = stores().await;
    let author = seed_user(&s, "author").await;
    let slug = seed_article(&s, &author, "discussed", &[]).await;
    let elsewhere = seed_article(&s, &author, "elsewhere", &[]).await;
    let comment = s.comments.add(&slug, &author, "hello").await.unwrap();

    assert_eq!(s.comments.delete(&elsewhere, comment.id).await.unwrap(), 0);
    assert_eq!(s.comments.delete(&slug, comment.id).await.unwrap(), 1);
    assert!(s.comments.find(comment.id, None).await.unwrap().is_none());
}

