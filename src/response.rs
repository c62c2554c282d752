//! JSON envelopes for book responses: `{data}` for one record,
//! `{data, meta: {count}}` for a listing.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub meta: ListingMeta,
}

#[derive(Serialize)]
pub struct ListingMeta {
    pub count: usize,
}

pub type Reply<B> = (StatusCode, Json<B>);

/// 201 with the newly stored record.
pub fn created<T: Serialize>(data: T) -> Reply<Data<T>> {
    (StatusCode::CREATED, Json(Data { data }))
}

pub fn ok<T: Serialize>(data: T) -> Reply<Data<T>> {
    (StatusCode::OK, Json(Data { data }))
}

pub fn listed<T: Serialize>(data: Vec<T>) -> Reply<Listing<T>> {
    let meta = ListingMeta { count: data.len() };
    (StatusCode::OK, Json(Listing { data, meta }))
}
