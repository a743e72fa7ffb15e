#![allow(dead_code)]

use jsonapi_query::model::Model;
use jsonapi_query::registry::Registry;
use jsonapi_query::resource::ResourceMeta;

#[derive(Model)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

#[derive(Model)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[jsonapi(to_one = Author)]
    pub author_id: i64,
}

#[derive(Model)]
pub struct Publisher {
    pub name: String,
}

#[derive(Model)]
pub struct Review {
    pub body: String,
    #[jsonapi(to_one = Book, related_name = "reviews")]
    pub book_id: i64,
    #[jsonapi(to_one = Author, related_name = "reviews_written")]
    pub reviewer_id: i64,
    #[jsonapi(to_one = Publisher)]
    pub publisher_id: i64,
}

/// Authors, books and reviews; publishers are not exposed.
pub fn library() -> Registry {
    let mut builder = Registry::builder();
    builder
        .register(ResourceMeta::for_model::<Author>())
        .unwrap()
        .register(ResourceMeta::for_model::<Book>())
        .unwrap()
        .register(ResourceMeta::for_model::<Review>())
        .unwrap();
    builder.build()
}
