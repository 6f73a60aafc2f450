//! Deadline scheduler — one-shot timers that fire at an absolute wall-clock time.
//!
//! Every armed deadline gets its own tokio task that sleeps until due and then
//! runs its callback. Nothing polls: an idle scheduler costs nothing.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Days, Local, NaiveDateTime, NaiveTime, TimeZone};
use duenote_core::NoteError;
use tokio::task::AbortHandle;

/// Identifies a single arming of a deadline. Never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Cancelable handle to an armed deadline.
#[derive(Debug)]
pub struct ScheduledTask {
    id: TaskId,
    handle: AbortHandle,
}

impl ScheduledTask {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// True once the callback has run or the task was cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Arms and cancels one-shot deadline callbacks.
#[derive(Debug, Default)]
pub struct DeadlineScheduler {
    next_id: AtomicU64,
}

impl DeadlineScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `on_fire` to run once at `deadline`.
    ///
    /// Returns `None` without scheduling anything when the deadline is not in
    /// the future. The callback receives the id of the task that fired so the
    /// owner can tell a current arming from a stale one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F, Fut>(&self, deadline: DateTime<Local>, on_fire: F) -> Option<ScheduledTask>
    where
        F: FnOnce(TaskId) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = match (deadline - Local::now()).to_std() {
            Ok(delay) if !delay.is_zero() => delay,
            _ => {
                tracing::warn!(
                    "⚠️ Deadline {} already passed — nothing scheduled",
                    deadline.format("%Y-%m-%d %H:%M:%S")
                );
                return None;
            }
        };

        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(id).await;
        })
        .abort_handle();

        tracing::debug!(
            "⏱️ Armed task {:?} for {} (in {}s)",
            id,
            deadline.format("%Y-%m-%d %H:%M:%S"),
            delay.as_secs()
        );

        Some(ScheduledTask { id, handle })
    }

    /// Stop `task` from firing. Safe to call repeatedly and after it fired.
    pub fn cancel(&self, task: &ScheduledTask) {
        if !task.is_finished() {
            tracing::debug!("🛑 Cancelled task {:?}", task.id);
        }
        task.handle.abort();
    }
}

/// Next occurrence of `hours:minutes:00` in local time: today if that moment
/// is still strictly ahead of `now`, otherwise the same time tomorrow.
pub fn next_occurrence(
    hours: i64,
    minutes: i64,
    now: DateTime<Local>,
) -> Result<DateTime<Local>, NoteError> {
    let time = u32::try_from(hours)
        .ok()
        .zip(u32::try_from(minutes).ok())
        .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .ok_or_else(|| {
            NoteError::InvalidTime(format!(
                "hours must be 0-23 and minutes 0-59, got {hours}:{minutes}"
            ))
        })?;

    let today = now.date_naive().and_time(time);
    let candidate = resolve_local(today)?;
    if candidate > now {
        return Ok(candidate);
    }

    let tomorrow = today
        .checked_add_days(Days::new(1))
        .ok_or_else(|| NoteError::InvalidTime(format!("{today} has no following day")))?;
    resolve_local(tomorrow)
}

/// Ambiguous local times resolve to the earlier instant; skipped ones are rejected.
fn resolve_local(naive: NaiveDateTime) -> Result<DateTime<Local>, NoteError> {
    Local.from_local_datetime(&naive).earliest().ok_or_else(|| {
        NoteError::InvalidTime(format!("{naive} does not exist in the local time zone"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_next_occurrence_later_today() {
        let now = local(2026, 6, 10, 8, 0, 0);
        let at = next_occurrence(9, 30, now).unwrap();
        assert_eq!(at, local(2026, 6, 10, 9, 30, 0));
    }

    #[test]
    fn test_next_occurrence_rolls_to_tomorrow() {
        let now = local(2026, 6, 10, 10, 0, 0);
        let at = next_occurrence(9, 30, now).unwrap();
        assert_eq!(at, local(2026, 6, 11, 9, 30, 0));
    }

    #[test]
    fn test_next_occurrence_exact_now_is_tomorrow() {
        let now = local(2026, 6, 10, 9, 30, 0);
        let at = next_occurrence(9, 30, now).unwrap();
        assert_eq!(at, local(2026, 6, 11, 9, 30, 0));
    }

    #[test]
    fn test_next_occurrence_crosses_month_end() {
        let now = local(2026, 6, 30, 23, 59, 30);
        let at = next_occurrence(0, 0, now).unwrap();
        assert_eq!(at, local(2026, 7, 1, 0, 0, 0));
    }

    #[test]
    fn test_next_occurrence_rejects_out_of_range() {
        let now = local(2026, 6, 10, 8, 0, 0);
        for (h, m) in [(24, 0), (99, 0), (-1, 0), (12, 60), (12, -5)] {
            let err = next_occurrence(h, m, now).unwrap_err();
            assert!(matches!(err, NoteError::InvalidTime(_)), "{h}:{m} -> {err:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_fires_once_after_delay() {
        let scheduler = DeadlineScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let task = scheduler
            .arm(Local::now() + chrono::Duration::seconds(5), move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .expect("future deadline should arm");

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());

        // Cancelling after the fact is a no-op.
        scheduler.cancel(&task);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let scheduler = DeadlineScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let task = scheduler
            .arm(Local::now() + chrono::Duration::seconds(5), move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        scheduler.cancel(&task);
        scheduler.cancel(&task);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_past_deadline_is_not_armed() {
        let scheduler = DeadlineScheduler::new();
        let task = scheduler.arm(Local::now() - chrono::Duration::seconds(1), |_| async {});
        assert!(task.is_none());
    }

    #[tokio::test]
    async fn test_task_ids_are_unique() {
        let scheduler = DeadlineScheduler::new();
        let at = Local::now() + chrono::Duration::hours(1);
        let a = scheduler.arm(at, |_| async {}).unwrap();
        let b = scheduler.arm(at, |_| async {}).unwrap();
        assert_ne!(a.id(), b.id());
        scheduler.cancel(&a);
        scheduler.cancel(&b);
    }
}
