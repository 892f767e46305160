pub mod email_with_attachments;
