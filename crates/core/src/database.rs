use std::collections::HashSet;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection, Row};
use tracing::debug;

use crate::config::AppConfig;
use crate::model::{
    ActiveCustomer, Delivery, DeliveryStatus, InsertableDelivery, Message, NewDelivery,
    NewMessage, Sender, StatusUpdate, StoredDelivery, StoredMessage,
};

/// Upper bound on rows returned by any listing query.
pub const RESULT_LIMIT: i64 = 1000;

const DELIVERY_COLUMNS: &str = "id, driver_id, customer_name, customer_phone, address, \
    latitude, longitude, status, order_details, created_at";
const MESSAGE_COLUMNS: &str = "id, driver_id, customer_name, text, sender, timestamp";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        let conn = Connection::open(config.db_path()).with_context(|| {
            format!("Failed to open database at {}", config.db_path().display())
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to configure SQLite WAL mode")?;

        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    pub fn insert_message(&self, new: NewMessage) -> Result<StoredMessage> {
        let stored = new.into_insertable();
        self.insert_message_record(&stored)?;
        Ok(stored)
    }

    /// Insert a message keeping its id and timestamp.
    pub fn insert_message_record(&self, stored: &StoredMessage) -> Result<()> {
        let message = &stored.message;
        self.conn.execute(
            "INSERT INTO messages (id, driver_id, customer_name, text, sender, timestamp)
             VALUES (:id, :driver_id, :customer_name, :text, :sender, :timestamp)",
            named_params![
                ":id": &message.id,
                ":driver_id": &stored.driver_id,
                ":customer_name": &message.customer_name,
                ":text": &message.text,
                ":sender": message.sender.as_str(),
                ":timestamp": message.timestamp.to_rfc3339(),
            ],
        )?;
        debug!(
            id = message.id.as_str(),
            driver = stored.driver_id.as_str(),
            "message stored"
        );
        Ok(())
    }

    pub fn messages_for_driver(&self, driver_id: &str) -> Result<Vec<StoredMessage>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE driver_id = :driver_id \
             ORDER BY timestamp ASC, rowid ASC LIMIT :limit"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(named_params![
            ":driver_id": driver_id,
            ":limit": RESULT_LIMIT,
        ])?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next()? {
            messages.push(map_message(row)?);
        }
        Ok(messages)
    }

    pub fn conversation(&self, driver_id: &str, customer_name: &str) -> Result<Vec<StoredMessage>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE driver_id = :driver_id AND customer_name = :customer_name \
             ORDER BY timestamp ASC, rowid ASC LIMIT :limit"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(named_params![
            ":driver_id": driver_id,
            ":customer_name": customer_name,
            ":limit": RESULT_LIMIT,
        ])?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next()? {
            messages.push(map_message(row)?);
        }
        Ok(messages)
    }

    pub fn insert_delivery(&self, new: NewDelivery) -> Result<StoredDelivery> {
        let insertable = new.into_insertable();
        let stored = stored_from_insertable(insertable);
        self.insert_delivery_record(&stored)?;
        Ok(stored)
    }

    /// Insert a delivery keeping its id, status and creation time.
    pub fn insert_delivery_record(&self, stored: &StoredDelivery) -> Result<()> {
        let delivery = &stored.delivery;
        self.conn.execute(
            "INSERT INTO deliveries (
                id, driver_id, customer_name, customer_phone, address, latitude, longitude,
                status, order_details, created_at
            ) VALUES (
                :id, :driver_id, :customer_name, :customer_phone, :address, :latitude, :longitude,
                :status, :order_details, :created_at
            )",
            named_params![
                ":id": &delivery.id,
                ":driver_id": &stored.driver_id,
                ":customer_name": &delivery.customer_name,
                ":customer_phone": &delivery.customer_phone,
                ":address": &delivery.address,
                ":latitude": delivery.latitude,
                ":longitude": delivery.longitude,
                ":status": delivery.status.as_str(),
                ":order_details": &delivery.order_details,
                ":created_at": stored.created_at.to_rfc3339(),
            ],
        )?;
        debug!(
            id = delivery.id.as_str(),
            driver = stored.driver_id.as_str(),
            "delivery stored"
        );
        Ok(())
    }

    /// Newest first.
    pub fn deliveries_for_driver(&self, driver_id: &str) -> Result<Vec<StoredDelivery>> {
        let sql = format!(
            "SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE driver_id = :driver_id \
             ORDER BY created_at DESC, rowid DESC LIMIT :limit"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(named_params![
            ":driver_id": driver_id,
            ":limit": RESULT_LIMIT,
        ])?;
        let mut deliveries = Vec::new();
        while let Some(row) = rows.next()? {
            deliveries.push(map_delivery(row)?);
        }
        Ok(deliveries)
    }

    pub fn fetch_delivery(&self, id: &str) -> Result<Option<StoredDelivery>> {
        let sql = format!("SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE id = ? LIMIT 1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(map_delivery(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn update_delivery_status(&self, id: &str, status: DeliveryStatus) -> Result<StatusUpdate> {
        let updated = self.conn.execute(
            "UPDATE deliveries SET status = :status WHERE id = :id",
            named_params![
                ":status": status.as_str(),
                ":id": id,
            ],
        )?;
        debug!(id, status = status.as_str(), updated, "delivery status update");
        Ok(StatusUpdate {
            id: id.to_string(),
            changed: updated > 0,
        })
    }

    /// One entry per customer with an open delivery, taken from the earliest
    /// such delivery.
    pub fn active_customers(&self, driver_id: &str) -> Result<Vec<ActiveCustomer>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_name, customer_phone, order_details, id FROM deliveries
             WHERE driver_id = :driver_id AND status IN ('pending', 'in_progress')
             ORDER BY rowid ASC",
        )?;
        let mut rows = stmt.query(named_params![":driver_id": driver_id])?;
        let mut seen = HashSet::new();
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            let customer_name: String = row.get(0)?;
            if !seen.insert(customer_name.clone()) {
                continue;
            }
            customers.push(ActiveCustomer {
                customer_name,
                customer_phone: row.get(1)?,
                latest_order: row.get(2)?,
                delivery_id: row.get(3)?,
            });
        }
        Ok(customers)
    }

    pub fn count_deliveries(&self, driver_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM deliveries WHERE driver_id = ?",
            [driver_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS deliveries (
                id TEXT PRIMARY KEY,
                driver_id TEXT NOT NULL,
                customer_name TEXT NOT NULL,
                customer_phone TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                order_details TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                driver_id TEXT NOT NULL,
                customer_name TEXT NOT NULL,
                text TEXT NOT NULL,
                sender TEXT NOT NULL,
                timestamp TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_deliveries_driver ON deliveries(driver_id, created_at);
             CREATE INDEX IF NOT EXISTS idx_messages_driver ON messages(driver_id, customer_name, timestamp);
            ",
        )?;
        Ok(())
    }
}

fn stored_from_insertable(insertable: InsertableDelivery) -> StoredDelivery {
    let data = insertable.data;
    StoredDelivery {
        driver_id: data.driver_id,
        delivery: Delivery {
            id: insertable.id,
            customer_name: data.customer_name,
            customer_phone: data.customer_phone,
            address: data.address,
            latitude: data.latitude,
            longitude: data.longitude,
            status: insertable.status,
            order_details: data.order_details,
        },
        created_at: insertable.created_at,
    }
}

fn map_delivery(row: &Row<'_>) -> Result<StoredDelivery> {
    let status_raw: String = row.get(7)?;
    Ok(StoredDelivery {
        driver_id: row.get(1)?,
        delivery: Delivery {
            id: row.get(0)?,
            customer_name: row.get(2)?,
            customer_phone: row.get(3)?,
            address: row.get(4)?,
            latitude: row.get(5)?,
            longitude: row.get(6)?,
            status: DeliveryStatus::from_raw(&status_raw),
            order_details: row.get(8)?,
        },
        created_at: parse_datetime_required(row.get::<_, String>(9)?)?,
    })
}

fn map_message(row: &Row<'_>) -> Result<StoredMessage> {
    let sender_raw: String = row.get(4)?;
    Ok(StoredMessage {
        driver_id: row.get(1)?,
        message: Message {
            id: row.get(0)?,
            customer_name: row.get(2)?,
            text: row.get(3)?,
            sender: sender_raw.parse::<Sender>()?,
            timestamp: parse_datetime_required(row.get::<_, String>(5)?)?,
        },
    })
}

fn parse_datetime_required(raw: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", raw, e))
}
