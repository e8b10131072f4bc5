//! Accessor dispatch for lazy attributes.
//!
//! Rather than generating one accessor per lazy attribute, a single generic
//! dispatcher consults the schema's lazy registry. Model layers that need a
//! computed or derived accessor implement [`Accessor`] and override
//! [`Accessor::read`]; the override takes precedence and can call back
//! through [`DefaultAccessor`] (or the [`Fetcher`] directly) for the stock
//! behavior.

use async_trait::async_trait;

use crate::error::LoadResult;
use crate::loader::LazyLoader;
use crate::record::Record;
use crate::traits::{BoxFuture, QueryEngine};
use crate::value::FieldValue;

/// Object-safe facade over the batch fetch coordinator.
pub trait Fetcher: Send + Sync {
    /// Fetch an absent attribute for a persisted record.
    fn fetch_value<'a>(
        &'a self,
        record: &'a Record,
        attribute: &'a str,
    ) -> BoxFuture<'a, LoadResult<FieldValue>>;
}

impl<E: QueryEngine> Fetcher for LazyLoader<E> {
    fn fetch_value<'a>(
        &'a self,
        record: &'a Record,
        attribute: &'a str,
    ) -> BoxFuture<'a, LoadResult<FieldValue>> {
        Box::pin(self.fetch(record, attribute))
    }
}

/// Attribute read behavior.
#[async_trait]
pub trait Accessor: Send + Sync {
    /// Read an attribute from a record.
    ///
    /// The default behavior: a present value wins; a new (unpersisted)
    /// record answers with the schema's declared default and never touches
    /// the fetcher; an absent lazy attribute on a persisted record goes
    /// through the fetcher; an absent non-lazy attribute reads as `Null`.
    async fn read(
        &self,
        fetcher: &dyn Fetcher,
        record: &Record,
        attribute: &str,
    ) -> LoadResult<FieldValue> {
        if let Some(value) = record.value(attribute) {
            return Ok(value);
        }
        if record.is_new() {
            return Ok(record.schema().default_of(attribute));
        }
        if record.schema().is_lazy(attribute) {
            return fetcher.fetch_value(record, attribute).await;
        }
        Ok(FieldValue::Null)
    }
}

/// The stock [`Accessor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAccessor;

impl Accessor for DefaultAccessor {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::schema::ModelSchema;
    use crate::value::ValueStore;

    /// Hands back a fixed value, counting nothing.
    struct StubFetcher(FieldValue);

    impl Fetcher for StubFetcher {
        fn fetch_value<'a>(
            &'a self,
            _record: &'a Record,
            _attribute: &'a str,
        ) -> BoxFuture<'a, LoadResult<FieldValue>> {
            Box::pin(async move { Ok(self.0.clone()) })
        }
    }

    /// Overrides reads of `greeting`, delegating everything else.
    struct GreetingAccessor;

    #[async_trait]
    impl Accessor for GreetingAccessor {
        async fn read(
            &self,
            fetcher: &dyn Fetcher,
            record: &Record,
            attribute: &str,
        ) -> LoadResult<FieldValue> {
            if attribute == "greeting" {
                let name = DefaultAccessor.read(fetcher, record, "name").await?;
                let name = match name {
                    FieldValue::String(s) => s,
                    _ => "stranger".to_string(),
                };
                return Ok(FieldValue::String(format!("hello, {name}")));
            }
            DefaultAccessor.read(fetcher, record, attribute).await
        }
    }

    fn schema() -> Arc<ModelSchema> {
        Arc::new(
            ModelSchema::builder("User", "users")
                .columns(["id", "name", "bio"])
                .identifier(["id"])
                .lazy(["bio"])
                .build(),
        )
    }

    #[tokio::test]
    async fn test_default_accessor_prefers_present_value() {
        let store: ValueStore = [("id", FieldValue::Int(1)), ("bio", "set".into())]
            .into_iter()
            .collect();
        let record = Record::hydrated(schema(), store);
        let fetcher = StubFetcher(FieldValue::String("fetched".into()));

        let value = DefaultAccessor.read(&fetcher, &record, "bio").await.unwrap();
        assert_eq!(value, FieldValue::String("set".into()));
    }

    #[tokio::test]
    async fn test_default_accessor_fetches_absent_lazy() {
        let store: ValueStore = [("id", 1i64)].into_iter().collect();
        let record = Record::hydrated(schema(), store);
        let fetcher = StubFetcher(FieldValue::String("fetched".into()));

        let value = DefaultAccessor.read(&fetcher, &record, "bio").await.unwrap();
        assert_eq!(value, FieldValue::String("fetched".into()));
    }

    #[tokio::test]
    async fn test_override_takes_precedence_and_calls_through() {
        let store: ValueStore = [("id", FieldValue::Int(1)), ("name", "ada".into())]
            .into_iter()
            .collect();
        let record = Record::hydrated(schema(), store);
        let fetcher = StubFetcher(FieldValue::Null);

        let greeting = GreetingAccessor
            .read(&fetcher, &record, "greeting")
            .await
            .unwrap();
        assert_eq!(greeting, FieldValue::String("hello, ada".into()));

        // Non-overridden attributes keep the stock behavior.
        let bio = GreetingAccessor.read(&fetcher, &record, "bio").await.unwrap();
        assert!(bio.is_null());
    }
}
