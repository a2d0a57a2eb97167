//! Services module

pub mod cache;
pub mod chart;
pub mod credentials;
pub mod gym;
pub mod habitica;
pub mod records;
pub mod sleep;
pub mod weekly;

pub use cache::RecordCache;
pub use chart::{reconcile, reconcile_today};
pub use credentials::{
    create_credential, delete_credential, find_credential, list_credentials, update_credential,
};
pub use gym::{insert_gym, list_gym, parse_gym_request, weekly_gym_for_user};
pub use habitica::{
    merge_external, parse_history_csv, sync_user_history, HabiticaClient, HistorySource,
};
pub use records::{fetch_recent_observations, latest_record_date, RECENT_DAYS};
pub use sleep::{list_sleep, parse_sleep_request, upsert_sleep, weekly_sleep_for_user};
pub use weekly::{weekly_gym, weekly_sleep};
