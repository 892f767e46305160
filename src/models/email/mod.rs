pub mod db_email;
pub mod direction;
pub mod email_summary;
pub mod task_status;
