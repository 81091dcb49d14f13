//! Postgres-backed invoice store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any other | `Backend` |
//! | PoolClosed / Io / other | N/A | `Backend` |
//!
//! Rows the schema should never produce (unknown enum text) surface as
//! `Backend` errors too.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;
use uuid::Uuid;

use billing_core::InvoiceId;
use billing_invoicing::{Invoice, InvoiceDraft, PageRequest, SearchFilter};

use super::{InvoiceStore, RepositoryError};

const SELECT_COLUMNS: &str = "SELECT id, service_name, amount, status, date FROM invoices";

/// Postgres-backed invoice store.
///
/// `PgPool` is `Send + Sync`; the store is cheap to clone and share.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceStore {
    pool: Arc<PgPool>,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the `invoices` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS invoices (
                id           UUID PRIMARY KEY,
                service_name TEXT NOT NULL CHECK (service_name IN ('DMP', 'SSP')),
                amount       DOUBLE PRECISION NOT NULL CHECK (amount >= 1),
                status       TEXT NOT NULL CHECK (status IN ('PAID', 'UNPAID', 'PENDING')),
                date         TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id), err)]
    async fn create(&self, invoice: Invoice) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO invoices (id, service_name, amount, status, date) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.service_name.as_str())
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&*self.pool)
        .await
        .map_err(|e| match map_sqlx_error("create", e) {
            RepositoryError::Conflict(_) => RepositoryError::Conflict(invoice.id),
            other => other,
        })?;
        Ok(())
    }

    #[instrument(skip(self, filter), err)]
    async fn list(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(SELECT_COLUMNS);

        // Same semantics as `SearchFilter::matches`: every term is a
        // case-insensitive substring of "<id> <service_name>".
        for (idx, term) in filter.terms().iter().enumerate() {
            query.push(if idx == 0 { " WHERE " } else { " AND " });
            query.push("(id::text || ' ' || service_name) ILIKE ");
            query.push_bind(format!("%{}%", escape_like(term)));
        }

        query.push(" ORDER BY date ASC, id ASC LIMIT ");
        query.push_bind(i64::from(page.page_size()));
        query.push(" OFFSET ");
        query.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = query
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(row_to_invoice).collect()
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn get(&self, id: InvoiceId) -> Result<Invoice, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?
            .ok_or(RepositoryError::NotFound)?;

        row_to_invoice(&row)
    }

    #[instrument(skip(self, draft), fields(invoice_id = %id), err)]
    async fn update(&self, id: InvoiceId, draft: &InvoiceDraft) -> Result<Invoice, RepositoryError> {
        draft.validate()?;

        let row = sqlx::query(
            r#"
            UPDATE invoices
            SET service_name = $1, amount = $2, status = $3
            WHERE id = $4
            RETURNING id, service_name, amount, status, date
            "#,
        )
        .bind(draft.service_name.as_str())
        .bind(draft.amount)
        .bind(draft.status.as_str())
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_invoice(&row)
    }

    #[instrument(skip(self), fields(invoice_id = %id), err)]
    async fn delete(&self, id: InvoiceId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn row_to_invoice(row: &sqlx::postgres::PgRow) -> Result<Invoice, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::backend("decode", e.to_string());

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let service_name: String = row.try_get("service_name").map_err(decode)?;
    let amount: f64 = row.try_get("amount").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;
    let date: DateTime<Utc> = row.try_get("date").map_err(decode)?;

    Ok(Invoice {
        id: InvoiceId::from_uuid(id),
        service_name: service_name
            .parse()
            .map_err(|e: billing_core::DomainError| RepositoryError::backend("decode", e.to_string()))?,
        amount,
        date,
        status: status
            .parse()
            .map_err(|e: billing_core::DomainError| RepositoryError::backend("decode", e.to_string()))?,
    })
}

/// Escape `ILIKE` wildcards so search terms match literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                // The caller knows which id collided.
                RepositoryError::Conflict(InvoiceId::from_uuid(Uuid::nil()))
            } else {
                RepositoryError::backend(operation, db_err.message().to_string())
            }
        }
        sqlx::Error::PoolClosed => RepositoryError::backend(operation, "connection pool closed"),
        other => RepositoryError::backend(operation, other.to_string()),
    }
}


/// Runs against the database named by `DATABASE_URL` and is skipped when it
/// is unset. Every test works in its own throwaway schema.
#[cfg(all(test, feature = "postgres"))]
mod db_tests {
    use std::str::FromStr;

    use chrono::{Duration, TimeZone};
    use sqlx::postgres::PgConnectOptions;

    use billing_invoicing::{InvoiceStatus, ServiceName};

    use super::*;
    use crate::invoice_store::InMemoryInvoiceStore;

    struct Scratch {
        store: PostgresInvoiceStore,
        admin: PgPool,
        schema: String,
    }

    impl Scratch {
        async fn open() -> Option<Self> {
            let Ok(url) = std::env::var("DATABASE_URL") else {
                eprintln!("DATABASE_URL not set; skipping postgres invoice store test");
                return None;
            };

            let admin = PgPool::connect(&url).await.expect("connect to DATABASE_URL");
            let schema = format!("billing_test_{}", Uuid::new_v4().simple());
            sqlx::query(&format!("CREATE SCHEMA {schema}"))
                .execute(&admin)
                .await
                .expect("create scratch schema");

            let options = PgConnectOptions::from_str(&url)
                .expect("parse DATABASE_URL")
                .options([("search_path", schema.as_str())]);
            let pool = PgPool::connect_with(options).await.expect("connect scratch pool");
            let store = PostgresInvoiceStore::new(pool);
            store.ensure_schema().await.expect("create invoices table");

            Some(Self { store, admin, schema })
        }

        async fn close(self) {
            self.store.pool.close().await;
            let _ = sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
                .execute(&self.admin)
                .await;
        }
    }

    fn draft(service: ServiceName, amount: f64, day: u32) -> InvoiceDraft {
        InvoiceDraft {
            service_name: service,
            amount,
            status: InvoiceStatus::Unpaid,
            date: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    fn invoice(service: ServiceName, amount: f64, day: u32) -> Invoice {
        draft(service, amount, day).into_invoice(InvoiceId::new()).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips_every_column() {
        let Some(db) = Scratch::open().await else { return };

        let mut inv = invoice(ServiceName::Ssp, 250.75, 4);
        inv.status = InvoiceStatus::Pending;
        db.store.create(inv.clone()).await.unwrap();

        assert_eq!(db.store.get(inv.id).await.unwrap(), inv);
        db.close().await;
    }

    #[tokio::test]
    async fn duplicate_create_conflicts_with_the_callers_id() {
        let Some(db) = Scratch::open().await else { return };

        let inv = invoice(ServiceName::Dmp, 100.0, 1);
        db.store.create(inv.clone()).await.unwrap();

        let err = db.store.create(inv.clone()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(id) if id == inv.id));
        db.close().await;
    }

    #[tokio::test]
    async fn list_filters_orders_and_pages() {
        let Some(db) = Scratch::open().await else { return };

        let late = invoice(ServiceName::Dmp, 1.0, 20);
        let early = invoice(ServiceName::Dmp, 2.0, 2);
        let other = invoice(ServiceName::Ssp, 3.0, 10);
        for inv in [&late, &early, &other] {
            db.store.create(inv.clone()).await.unwrap();
        }

        let all = db
            .store
            .list(&SearchFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all, vec![early.clone(), other.clone(), late.clone()]);

        let dmp = db
            .store
            .list(&SearchFilter::parse(Some("DMP")), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(dmp, vec![early.clone(), late.clone()]);

        let second_page = db
            .store
            .list(&SearchFilter::default(), PageRequest::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(second_page, vec![late]);

        // Wildcards in a term match literally.
        let wildcard = db
            .store
            .list(&SearchFilter::parse(Some("d_p")), PageRequest::default())
            .await
            .unwrap();
        assert!(wildcard.is_empty());
        db.close().await;
    }

    #[tokio::test]
    async fn listing_agrees_with_the_in_memory_store() {
        let Some(db) = Scratch::open().await else { return };

        let seed: Vec<Invoice> = (1..=7)
            .map(|day| {
                let service = if day % 2 == 0 { ServiceName::Ssp } else { ServiceName::Dmp };
                invoice(service, f64::from(day) * 10.0, day)
            })
            .collect();
        for inv in &seed {
            db.store.create(inv.clone()).await.unwrap();
        }
        let memory = InMemoryInvoiceStore::with_invoices(seed.clone());

        let known_id = seed[3].id.to_string();
        let filters = [
            None,
            Some("dmp"),
            Some("SSP"),
            Some(&known_id[..8]),
            Some("dmp ssp"),
            Some("50%"),
            Some("d_p"),
        ];
        let pages = [
            PageRequest::default(),
            PageRequest::new(Some(2), Some(3)),
            PageRequest::new(Some(3), Some(3)),
            PageRequest::new(Some(9), Some(3)),
        ];

        for raw in filters {
            let filter = SearchFilter::parse(raw);
            for page in pages {
                assert_eq!(
                    db.store.list(&filter, page).await.unwrap(),
                    memory.list(&filter, page).await.unwrap(),
                    "search {raw:?}, {page:?}"
                );
            }
        }
        db.close().await;
    }

    #[tokio::test]
    async fn update_preserves_date_and_validates() {
        let Some(db) = Scratch::open().await else { return };

        let inv = invoice(ServiceName::Dmp, 10.0, 5);
        db.store.create(inv.clone()).await.unwrap();

        let mut change = draft(ServiceName::Ssp, 75.0, 5);
        change.status = InvoiceStatus::Paid;
        change.date = inv.date + Duration::days(30);
        let updated = db.store.update(inv.id, &change).await.unwrap();

        assert_eq!(updated.service_name, ServiceName::Ssp);
        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert_eq!(updated.amount, 75.0);
        assert_eq!(updated.date, inv.date);
        assert_eq!(db.store.get(inv.id).await.unwrap(), updated);

        let err = db
            .store
            .update(inv.id, &draft(ServiceName::Ssp, 0.5, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Domain(_)));
        assert_eq!(db.store.get(inv.id).await.unwrap().amount, 75.0);
        db.close().await;
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let Some(db) = Scratch::open().await else { return };
        let id = InvoiceId::new();

        assert!(matches!(db.store.get(id).await, Err(RepositoryError::NotFound)));
        assert!(matches!(db.store.delete(id).await, Err(RepositoryError::NotFound)));
        assert!(matches!(
            db.store.update(id, &draft(ServiceName::Dmp, 5.0, 1)).await,
            Err(RepositoryError::NotFound)
        ));
        db.close().await;
    }

    #[tokio::test]
    async fn delete_removes_invoice() {
        let Some(db) = Scratch::open().await else { return };

        let inv = invoice(ServiceName::Ssp, 10.0, 5);
        db.store.create(inv.clone()).await.unwrap();
        db.store.delete(inv.id).await.unwrap();

        assert!(matches!(db.store.get(inv.id).await, Err(RepositoryError::NotFound)));
        assert!(matches!(db.store.delete(inv.id).await, Err(RepositoryError::NotFound)));
        db.close().await;
    }
}
