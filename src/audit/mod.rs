// Audit trail for completed submissions
//
// One JSON object per line, appended under an exclusive file lock so that
// concurrent writers (server tasks or separate processes) never interleave
// partial lines.

pub mod logger;

pub use logger::{AuditLogger, AuditRecord};
