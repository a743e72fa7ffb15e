use jsonapi_query::fields::FieldResolver;
use jsonapi_query::model::{Model, ModelDescriptor};
use jsonapi_query::registry::{Registry, RegistryError};
use jsonapi_query::resource::{ResourceError, ResourceMeta};

use crate::models::{Author, Book};

#[derive(Model)]
#[jsonapi(model_name = "Article")]
struct Post {
    #[jsonapi(rename = "headline")]
    title: String,
    #[jsonapi(exclude)]
    cache: Vec<u8>,
    #[jsonapi(to_one = crate::models::Author, rename = "writer_id", related_name = "articles")]
    author: i64,
    #[jsonapi(to_one = Book)]
    book_id: Option<i64>,
}

#[derive(Model)]
#[jsonapi(abstract_model)]
struct Timestamped {
    created: String,
    modified: String,
}

#[derive(Model)]
#[jsonapi(model_name = "Draft")]
#[jsonapi(abstract_model)]
struct Scratch {
    #[jsonapi(to_one = Author)]
    #[jsonapi(rename = "writer_id")]
    author: i64,
    #[jsonapi(rename = "subject")]
    #[jsonapi(to_one = Book)]
    #[jsonapi(related_name = "scratches")]
    book: i64,
    #[jsonapi(rename = "notes")]
    #[jsonapi(exclude)]
    body: String,
}

mod archive {
    use jsonapi_query::model::Model;

    #[derive(Model)]
    pub struct Author {
        pub id: i64,
        pub pen_name: String,
    }
}

#[derive(Model)]
struct Comment {
    text: String,
    #[jsonapi(to_one = archive::Author)]
    author_id: i64,
}

#[derive(Model)]
struct Wrapper<T> {
    value: T,
}

#[test]
fn test_derived_descriptor() {
    let post = ModelDescriptor::of::<Post>();
    assert_eq!(post.id(), Post::model_id());
    assert_eq!(post.id().name(), "Article");
    assert_eq!(post.id().path(), "test_suite::derive::Post");
    assert_eq!(post.fields().collect::<Vec<_>>(), vec!["headline"]);
    assert!(!post.has_field("cache"));

    let edges = post.relations().collect::<Vec<_>>();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].attribute(), "writer_id");
    assert_eq!(edges[0].target(), Author::model_id());
    assert_eq!(edges[0].related_name(), Some("articles"));
    assert_eq!(edges[1].attribute(), "book_id");
    assert_eq!(edges[1].target(), Book::model_id());
    assert_eq!(edges[1].related_name(), None);
}

#[test]
fn test_generic_model() {
    let wrapper = ModelDescriptor::of::<Wrapper<u32>>();
    assert_eq!(wrapper.id(), Wrapper::<String>::model_id());
    assert_eq!(wrapper.id().name(), "Wrapper");
    assert_eq!(wrapper.fields().collect::<Vec<_>>(), vec!["value"]);
}

#[test]
fn test_abstract_model_is_rejected() {
    assert!(Timestamped::is_abstract());
    assert!(ModelDescriptor::of::<Timestamped>().is_abstract());

    let mut builder = Registry::builder();
    let err = builder
        .register(ResourceMeta::for_model::<Timestamped>())
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Resource(ResourceError::AbstractModel(id)) if id.name() == "Timestamped"
    ));
}

#[test]
fn test_default_resource_name() {
    let mut builder = Registry::builder();
    builder
        .register(ResourceMeta::for_model::<Post>())
        .unwrap()
        .register(ResourceMeta::for_model::<Author>())
        .unwrap();
    let registry = builder.build();
    let post = registry.get(Post::model_id()).unwrap();
    assert_eq!(post.name(), "article");
    assert_eq!(post.name_plural(), "articles");
}

#[test]
fn test_split_field_attributes() {
    let scratch = ModelDescriptor::of::<Scratch>();
    assert_eq!(scratch.fields().count(), 0);

    let edges = scratch.relations().collect::<Vec<_>>();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].attribute(), "writer_id");
    assert_eq!(edges[0].target(), Author::model_id());
    assert_eq!(edges[0].related_name(), None);
    assert_eq!(edges[1].attribute(), "subject");
    assert_eq!(edges[1].target(), Book::model_id());
    assert_eq!(edges[1].related_name(), Some("scratches"));
}

#[test]
fn test_split_container_attributes() {
    assert!(Scratch::is_abstract());
    assert_eq!(Scratch::model_id().name(), "Draft");
}

#[test]
fn test_same_name_in_other_module() {
    assert_ne!(archive::Author::model_id(), Author::model_id());
    assert_eq!(archive::Author::model_id().name(), Author::model_id().name());
    assert_eq!(
        archive::Author::model_id().path(),
        "test_suite::derive::archive::Author"
    );

    let mut builder = Registry::builder();
    builder
        .register(ResourceMeta::for_model::<Author>())
        .unwrap()
        .register(ResourceMeta::for_model::<Comment>())
        .unwrap();
    let registry = builder.build();
    assert!(!registry.contains(archive::Author::model_id()));

    let resolver = FieldResolver::new(&registry);
    let comment = resolver.resolve(Comment::model_id()).unwrap();
    assert_eq!(comment.keys().collect::<Vec<_>>(), vec!["id", "text"]);
    assert_eq!(comment.to_one().count(), 0);

    let author = resolver.resolve(Author::model_id()).unwrap();
    assert_eq!(author.to_many().count(), 0);
}
