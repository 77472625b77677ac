//! Reconciliation of the registry against the OS process table, and the
//! HTML-ish summary built from what survives.

use std::path::Path;

use crate::error::RegistryError;
use crate::process_monitor::LivenessCheck;
use crate::registry::{self, EventKind, ScheduledEvent};

/// Returns the records whose alert child is still running, in file order.
///
/// Liveness is decided by the pid alone; a record's fire time never prunes
/// it, since an alarm set for a past time still has a running child.
/// Read errors propagate. If anything was pruned the file is rewritten with
/// only the live records; a failed rewrite is logged and otherwise ignored.
pub async fn list_active<P: LivenessCheck>(
    path: &Path,
    processes: &mut P,
) -> Result<Vec<ScheduledEvent>, RegistryError> {
    let records = registry::read_all(path).await?;
    let total = records.len();

    let live: Vec<ScheduledEvent> = records
        .into_iter()
        .filter(|record| processes.is_running(record.pid))
        .collect();

    if live.len() != total {
        tracing::debug!(pruned = total - live.len(), kept = live.len(), "pruning registry");
        if let Err(e) = registry::overwrite(path, &live).await {
            tracing::warn!(error = %e, "failed to prune registry");
        }
    }
    Ok(live)
}

/// Renders live events as `<h3>Timers</h3><ul>…</ul><h3>Alarms</h3><ul>…</ul>`.
///
/// Empty sections are omitted, so no events renders as `""`.
pub fn render(events: &[ScheduledEvent]) -> String {
    let items = |kind: EventKind| {
        events
            .iter()
            .filter(|e| e.kind == kind)
            .map(render_item)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut content = String::new();
    let timers = items(EventKind::Timer);
    if !timers.is_empty() {
        content.push_str(&format!("<h3>Timers</h3><ul>{timers}</ul>"));
    }
    let alarms = items(EventKind::Alarm);
    if !alarms.is_empty() {
        content.push_str(&format!("<h3>Alarms</h3><ul>{alarms}</ul>"));
    }
    content
}

fn render_item(event: &ScheduledEvent) -> String {
    let (label, joiner) = match event.kind {
        EventKind::Timer => ("Timer", "for"),
        EventKind::Alarm => ("Alarm", "at"),
    };
    let message = event.message.as_deref().unwrap_or(label);
    format!(
        "<li>{} {joiner} {}</li>",
        escape_html(message),
        escape_html(&event.display_time)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_monitor::ProcessTable;
    use std::collections::HashSet;

    /// Liveness over a fixed set of live pids.
    struct FakeProcesses {
        live: HashSet<u32>,
        checked: Vec<u32>,
    }

    impl FakeProcesses {
        fn with_live(pids: &[u32]) -> Self {
            Self {
                live: pids.iter().copied().collect(),
                checked: Vec::new(),
            }
        }
    }

    impl LivenessCheck for FakeProcesses {
        fn is_running(&mut self, pid: u32) -> bool {
            self.checked.push(pid);
            self.live.contains(&pid)
        }
    }

    fn event(pid: u32, kind: EventKind, message: Option<&str>, display: &str) -> ScheduledEvent {
        ScheduledEvent {
            pid,
            time: 1_700_000_000,
            kind,
            message: message.map(str::to_string),
            display_time: display.to_string(),
        }
    }

    async fn seed(path: &Path, records: &[ScheduledEvent]) {
        for r in records {
            registry::append(path, r).await.unwrap();
        }
    }

    // ── list_active ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn list_active_prunes_dead_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".timer-registry");
        let records = vec![
            event(1, EventKind::Timer, None, "a"),
            event(2, EventKind::Alarm, None, "b"),
            event(3, EventKind::Timer, Some("tea"), "c"),
            event(4, EventKind::Alarm, None, "d"),
        ];
        seed(&path, &records).await;

        let mut processes = FakeProcesses::with_live(&[2, 3]);
        let live = list_active(&path, &mut processes).await.unwrap();
        assert_eq!(live, vec![records[1].clone(), records[2].clone()]);
        assert_eq!(processes.checked, vec![1, 2, 3, 4]);

        assert_eq!(registry::read_all(&path).await.unwrap(), live);
    }

    #[tokio::test]
    async fn list_active_all_live_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".timer-registry");
        seed(
            &path,
            &[
                event(1, EventKind::Timer, None, "a"),
                event(2, EventKind::Alarm, None, "b"),
            ],
        )
        .await;
        // Extra blank line a rewrite would drop.
        let mut before = std::fs::read_to_string(&path).unwrap();
        before.push('\n');
        std::fs::write(&path, &before).unwrap();

        let mut processes = FakeProcesses::with_live(&[1, 2]);
        let live = list_active(&path, &mut processes).await.unwrap();
        assert_eq!(live.len(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn list_active_all_dead_empties_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".timer-registry");
        seed(&path, &[event(9, EventKind::Timer, None, "a")]).await;

        let mut processes = FakeProcesses::with_live(&[]);
        assert!(list_active(&path, &mut processes).await.unwrap().is_empty());
        assert!(registry::read_all(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_active_missing_registry_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".timer-registry");
        let mut processes = FakeProcesses::with_live(&[]);
        let err = list_active(&path, &mut processes).await.unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[tokio::test]
    async fn list_active_corrupt_registry_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".timer-registry");
        std::fs::write(&path, "garbage\n").unwrap();
        let mut processes = FakeProcesses::with_live(&[]);
        let err = list_active(&path, &mut processes).await.unwrap_err();
        assert!(matches!(err, RegistryError::Parse { .. }));
    }

    #[tokio::test]
    async fn list_active_keeps_record_whose_fire_time_has_passed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".timer-registry");
        let mut record = event(5, EventKind::Alarm, None, "a");
        record.time = 0;
        seed(&path, &[record.clone()]).await;

        let mut processes = FakeProcesses::with_live(&[5]);
        assert_eq!(list_active(&path, &mut processes).await.unwrap(), vec![record.clone()]);
        assert_eq!(registry::read_all(&path).await.unwrap(), vec![record]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn list_active_keeps_live_child_of_past_alarm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".timer-registry");
        let mut child = std::process::Command::new("sleep").arg("30").spawn().unwrap();

        // What create_alarm records for a target five minutes in the past.
        let record = ScheduledEvent {
            pid: child.id(),
            time: chrono::Local::now().timestamp() - 300,
            kind: EventKind::Alarm,
            message: Some("stand-up".to_string()),
            display_time: "3:40pm".to_string(),
        };
        seed(&path, &[record.clone()]).await;

        let mut table = ProcessTable::new();
        let live = list_active(&path, &mut table).await;
        child.kill().unwrap();
        child.wait().unwrap();

        assert_eq!(live.unwrap(), vec![record.clone()]);
        assert_eq!(registry::read_all(&path).await.unwrap(), vec![record]);
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn render_empty_is_empty_string() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn render_one_timer_has_no_alarms_heading() {
        let html = render(&[event(1, EventKind::Timer, Some("tea"), "1 minute started at 3:45pm")]);
        assert_eq!(
            html,
            "<h3>Timers</h3><ul><li>tea for 1 minute started at 3:45pm</li></ul>"
        );
        assert!(!html.contains("Alarms"));
    }

    #[test]
    fn render_groups_timers_before_alarms() {
        let html = render(&[
            event(1, EventKind::Alarm, None, "7:00am"),
            event(2, EventKind::Timer, None, "5 minutes started at 3:00pm"),
            event(3, EventKind::Timer, Some("eggs"), "3 minutes started at 3:01pm"),
        ]);
        assert_eq!(
            html,
            "<h3>Timers</h3><ul><li>Timer for 5 minutes started at 3:00pm</li>\n\
             <li>eggs for 3 minutes started at 3:01pm</li></ul>\
             <h3>Alarms</h3><ul><li>Alarm at 7:00am</li></ul>"
        );
    }

    #[test]
    fn render_escapes_markup_in_messages() {
        let html = render(&[event(1, EventKind::Alarm, Some("<b>R&D</b>"), "9:00am")]);
        assert!(html.contains("&lt;b&gt;R&amp;D&lt;/b&gt;"));
    }
}
