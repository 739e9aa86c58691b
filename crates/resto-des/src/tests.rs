//! Unit tests for resto-des.

use resto_core::{PoolId, ProcessId, SimTime};

use crate::{Context, DesError, DesResult, Process, ProcessState, Scheduler, Yield};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Log of `(label, start, end)` holds written by [`Holder`].
type HoldLog = Vec<(u32, f64, f64)>;

/// Acquire `amount` of `pool`, hold it for `hold`, release, exit.
struct Holder {
    label:   u32,
    pool:    PoolId,
    amount:  u32,
    hold:    f64,
    stage:   u8,
    started: f64,
}

impl Holder {
    fn new(label: u32, pool: PoolId, amount: u32, hold: f64) -> Self {
        Self { label, pool, amount, hold, stage: 0, started: 0.0 }
    }
}

impl Process<HoldLog> for Holder {
    fn resume(&mut self, cx: &mut Context<'_, HoldLog>) -> DesResult<Yield> {
        self.stage += 1;
        match self.stage {
            1 => Ok(Yield::Acquire { pool: self.pool, amount: self.amount }),
            2 => {
                self.started = cx.now().as_f64();
                Ok(Yield::Timeout(self.hold))
            }
            _ => {
                cx.release(self.pool, self.amount)?;
                cx.world.push((self.label, self.started, cx.now().as_f64()));
                Ok(Yield::Exit)
            }
        }
    }
}

/// Acquires a unit and exits without releasing it.
struct Leaker {
    pool:  PoolId,
    stage: u8,
}

impl Process<HoldLog> for Leaker {
    fn resume(&mut self, _cx: &mut Context<'_, HoldLog>) -> DesResult<Yield> {
        self.stage += 1;
        match self.stage {
            1 => Ok(Yield::Acquire { pool: self.pool, amount: 1 }),
            _ => Ok(Yield::Exit),
        }
    }
}

/// Ticks forever, logging each wake-up.
struct Ticker {
    period: f64,
}

impl Process<Vec<f64>> for Ticker {
    fn resume(&mut self, cx: &mut Context<'_, Vec<f64>>) -> DesResult<Yield> {
        cx.world.push(cx.now().as_f64());
        Ok(Yield::Timeout(self.period))
    }
}

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;
    use crate::EventQueue;

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.schedule(5.0, 'c').unwrap();
        q.schedule(1.0, 'a').unwrap();
        q.schedule(3.0, 'b').unwrap();

        let mut seen = Vec::new();
        while let Some(ev) = q.pop_due(SimTime(100.0)).unwrap() {
            seen.push((ev.payload, ev.due.as_f64()));
        }
        assert_eq!(seen, vec![('a', 1.0), ('b', 3.0), ('c', 5.0)]);
        assert_eq!(q.now(), SimTime(5.0));
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut q = EventQueue::new();
        for i in 0..10 {
            q.schedule(2.0, i).unwrap();
        }
        let order: Vec<i32> = std::iter::from_fn(|| q.pop_due(SimTime(2.0)).unwrap())
            .map(|e| e.payload)
            .collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn horizon_is_inclusive() {
        let mut q = EventQueue::new();
        q.schedule(10.0, "at").unwrap();
        q.schedule(10.5, "after").unwrap();
        assert_eq!(q.pop_due(SimTime(10.0)).unwrap().map(|e| e.payload), Some("at"));
        assert!(q.pop_due(SimTime(10.0)).unwrap().is_none());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn cancelled_event_never_fires() {
        let mut q = EventQueue::new();
        let h = q.schedule(1.0, "cancelled").unwrap();
        q.schedule(2.0, "kept").unwrap();
        assert!(q.cancel(h));
        assert_eq!(q.len(), 1);
        assert!(!q.is_pending(h));
        assert_eq!(q.pop_due(SimTime(5.0)).unwrap().map(|e| e.payload), Some("kept"));
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_after_fire_is_a_noop() {
        let mut q = EventQueue::new();
        let h = q.schedule(1.0, ()).unwrap();
        q.pop_due(SimTime(1.0)).unwrap();
        assert!(!q.cancel(h));
        assert!(!q.cancel(h));
    }

    #[test]
    fn negative_or_nan_delay_rejected() {
        let mut q = EventQueue::new();
        assert!(matches!(q.schedule(-1.0, ()), Err(DesError::InvalidDelay(_))));
        assert!(matches!(q.schedule(f64::NAN, ()), Err(DesError::InvalidDelay(_))));
        assert!(q.is_empty());
    }

    #[test]
    fn schedule_at_in_the_past_rejected() {
        let mut q = EventQueue::new();
        q.schedule(4.0, 0).unwrap();
        q.pop_due(SimTime(4.0)).unwrap();
        let err = q.schedule_at(SimTime(3.0), 1).unwrap_err();
        assert!(matches!(err, DesError::EventInPast { .. }));
        assert!(q.schedule_at(SimTime(4.0), 2).is_ok());
    }

    #[test]
    fn infinite_delay_never_pops() {
        let mut q = EventQueue::new();
        q.schedule(f64::INFINITY, ()).unwrap();
        assert!(q.pop_due(SimTime::NEVER).unwrap().is_none());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn run_until_fires_follow_ups() {
        let mut q = EventQueue::new();
        q.schedule(1.0, 3u32).unwrap();
        let mut log = Vec::new();
        let fired = q
            .run_until(SimTime(100.0), |q, remaining| {
                log.push(q.now().as_f64());
                if remaining > 0 {
                    q.schedule(2.0, remaining - 1)?;
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(fired, 4);
        assert_eq!(log, vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn next_due_skips_cancelled() {
        let mut q = EventQueue::new();
        let h = q.schedule(1.0, ()).unwrap();
        q.schedule(2.0, ()).unwrap();
        q.cancel(h);
        assert_eq!(q.next_due(), Some(SimTime(2.0)));
    }
}

// ── ResourcePool ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod pool {
    use super::*;
    use crate::{RequestOutcome, ResourcePool};

    const T0: SimTime = SimTime::ZERO;

    fn pool(capacity: u32) -> ResourcePool {
        ResourcePool::new(PoolId(0), "kitchen", capacity)
    }

    #[test]
    fn grants_until_full_then_queues() {
        let mut p = pool(2);
        assert_eq!(p.request(ProcessId(1), 1, T0).unwrap(), RequestOutcome::Granted);
        assert_eq!(p.request(ProcessId(2), 1, T0).unwrap(), RequestOutcome::Granted);
        assert_eq!(p.request(ProcessId(3), 1, T0).unwrap(), RequestOutcome::Queued);
        assert_eq!(p.held(), 2);
        assert_eq!(p.available(), 0);
        assert_eq!(p.queue_len(), 1);
    }

    #[test]
    fn release_grants_head_of_queue() {
        let mut p = pool(1);
        p.request(ProcessId(1), 1, T0).unwrap();
        p.request(ProcessId(2), 1, T0).unwrap();
        p.request(ProcessId(3), 1, T0).unwrap();

        let granted = p.release(ProcessId(1), 1, SimTime(5.0)).unwrap();
        assert_eq!(granted, vec![(ProcessId(2), 1)]);
        assert_eq!(p.held_by(ProcessId(2)), 1);
        assert_eq!(p.held(), 1);
        assert_eq!(p.queue_len(), 1);
    }

    #[test]
    fn strict_fifo_no_overtaking() {
        // Capacity 3: A holds 2, B queues for 2, C queues for 1.
        // When nothing frees up, C must not jump ahead of B even though it fits.
        let mut p = pool(3);
        p.request(ProcessId(1), 2, T0).unwrap();
        assert_eq!(p.request(ProcessId(2), 2, T0).unwrap(), RequestOutcome::Queued);
        assert_eq!(p.request(ProcessId(3), 1, T0).unwrap(), RequestOutcome::Queued);
        assert_eq!(p.held(), 2);

        let granted = p.release(ProcessId(1), 2, SimTime(1.0)).unwrap();
        assert_eq!(granted, vec![(ProcessId(2), 2), (ProcessId(3), 1)]);
        assert_eq!(p.held(), 3);
    }

    #[test]
    fn release_stops_at_first_head_that_does_not_fit() {
        let mut p = pool(2);
        p.request(ProcessId(1), 1, T0).unwrap();
        p.request(ProcessId(2), 1, T0).unwrap();
        p.request(ProcessId(3), 2, T0).unwrap();
        p.request(ProcessId(4), 1, T0).unwrap();

        // One unit frees: head needs 2, so nobody is granted.
        assert!(p.release(ProcessId(1), 1, T0).unwrap().is_empty());
        let order: Vec<ProcessId> = p.waiters().map(|w| w.process).collect();
        assert_eq!(order, vec![ProcessId(3), ProcessId(4)]);
    }

    #[test]
    fn over_release_is_a_fault() {
        let mut p = pool(2);
        p.request(ProcessId(1), 1, T0).unwrap();
        let err = p.release(ProcessId(1), 2, T0).unwrap_err();
        assert!(matches!(err, DesError::OverRelease { amount: 2, held: 1, .. }));
        let err = p.release(ProcessId(9), 1, T0).unwrap_err();
        assert!(matches!(err, DesError::OverRelease { held: 0, .. }));
        assert_eq!(p.held(), 1);
    }

    #[test]
    fn request_above_capacity_rejected_eagerly() {
        let mut p = pool(2);
        let err = p.request(ProcessId(1), 3, T0).unwrap_err();
        assert!(matches!(err, DesError::ExceedsCapacity { requested: 3, capacity: 2, .. }));
        assert_eq!(p.queue_len(), 0);
    }

    #[test]
    fn zero_amount_rejected() {
        let mut p = pool(2);
        assert!(matches!(p.request(ProcessId(1), 0, T0), Err(DesError::ZeroAmount { .. })));
        assert!(matches!(p.release(ProcessId(1), 0, T0), Err(DesError::ZeroAmount { .. })));
    }

    #[test]
    fn try_request_never_queues() {
        let mut p = pool(1);
        assert!(p.try_request(ProcessId(1), 1, T0).unwrap());
        assert!(!p.try_request(ProcessId(2), 1, T0).unwrap());
        assert_eq!(p.queue_len(), 0);
        // Larger than capacity is a refusal, not a fault.
        assert!(!p.try_request(ProcessId(3), 5, T0).unwrap());
    }

    #[test]
    fn try_request_on_zero_capacity_refuses() {
        let mut p = pool(0);
        assert!(!p.try_request(ProcessId(1), 1, T0).unwrap());
        assert_eq!(p.held(), 0);
    }

    #[test]
    fn try_request_does_not_overtake_waiters() {
        let mut p = pool(2);
        p.request(ProcessId(1), 1, T0).unwrap();
        p.request(ProcessId(2), 2, T0).unwrap(); // queued
        assert!(!p.try_request(ProcessId(3), 1, T0).unwrap());
    }

    #[test]
    fn withdraw_unblocks_followers() {
        let mut p = pool(2);
        p.request(ProcessId(1), 1, T0).unwrap();
        p.request(ProcessId(2), 2, T0).unwrap(); // head, does not fit
        p.request(ProcessId(3), 1, T0).unwrap(); // blocked behind head
        let granted = p.withdraw(ProcessId(2), SimTime(1.0));
        assert_eq!(granted, vec![(ProcessId(3), 1)]);
        assert_eq!(p.queue_len(), 0);
    }

    #[test]
    fn report_utilisation_and_queue_delay() {
        let mut p = pool(2);
        p.request(ProcessId(1), 2, T0).unwrap();
        p.request(ProcessId(2), 1, SimTime(1.0)).unwrap(); // queued at t=1
        p.release(ProcessId(1), 2, SimTime(4.0)).unwrap(); // 2 units busy for 4
        p.release(ProcessId(2), 1, SimTime(8.0)).unwrap(); // 1 unit busy for 4

        let r = p.report(SimTime(10.0));
        assert_eq!(r.grants, 2);
        assert_eq!(r.queued_grants, 1);
        assert_eq!(r.max_queue_len, 1);
        assert!((r.mean_queue_delay - 3.0).abs() < 1e-12);
        // (2*4 + 1*4) / (2 * 10)
        assert!((r.utilisation - 0.6).abs() < 1e-12);
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn same_instant_contention_is_fifo() {
        // One station, two holders arriving at t=0 in spawn order.
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        let kitchen = sched.add_pool("kitchen", 1).unwrap();
        sched.spawn(Holder::new(1, kitchen, 1, 5.0)).unwrap();
        sched.spawn(Holder::new(2, kitchen, 1, 5.0)).unwrap();

        let mut log = HoldLog::new();
        sched.run_until(SimTime(100.0), &mut log).unwrap();
        assert_eq!(log, vec![(1, 0.0, 5.0), (2, 5.0, 10.0)]);
        assert_eq!(sched.pool(kitchen).unwrap().held(), 0);
        assert_eq!(sched.live_processes(), 0);
    }

    #[test]
    fn pool_ids_stop_short_of_sentinel() {
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        for i in 0..u16::MAX {
            assert_eq!(sched.add_pool("station", 1).unwrap(), PoolId(i));
        }
        assert!(matches!(
            sched.add_pool("one-too-many", 1),
            Err(DesError::TooManyPools(n)) if n == usize::from(u16::MAX)
        ));
    }

    #[test]
    fn capacity_never_exceeded() {
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        let pool = sched.add_pool("servers", 3).unwrap();
        for i in 0..20 {
            sched.spawn(Holder::new(i, pool, 1 + i % 3, 1.0 + (i % 4) as f64)).unwrap();
        }
        let mut log = HoldLog::new();
        while sched.step(SimTime(1_000.0), &mut log).unwrap() {
            let p = sched.pool(pool).unwrap();
            assert!(p.held() <= p.capacity());
        }
        assert_eq!(log.len(), 20);
    }

    #[test]
    fn grants_follow_enqueue_order() {
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        let pool = sched.add_pool("kitchen", 1).unwrap();
        for i in 0..5 {
            sched.spawn(Holder::new(i, pool, 1, 2.0)).unwrap();
        }
        let mut log = HoldLog::new();
        sched.run_until(SimTime(100.0), &mut log).unwrap();
        let starts: Vec<(u32, f64)> = log.iter().map(|&(l, s, _)| (l, s)).collect();
        assert_eq!(starts, vec![(0, 0.0), (1, 2.0), (2, 4.0), (3, 6.0), (4, 8.0)]);
    }

    #[test]
    fn horizon_stops_the_run() {
        let mut sched: Scheduler<Vec<f64>> = Scheduler::new();
        sched.spawn(Ticker { period: 3.0 }).unwrap();
        let mut log = Vec::new();
        sched.run_until(SimTime(10.0), &mut log).unwrap();
        assert_eq!(log, vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(sched.now(), SimTime(9.0));
        assert_eq!(sched.next_due(), Some(SimTime(12.0)));
    }

    #[test]
    fn states_track_suspension() {
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        let pool = sched.add_pool("kitchen", 1).unwrap();
        let a = sched.spawn(Holder::new(1, pool, 1, 5.0)).unwrap();
        let b = sched.spawn(Holder::new(2, pool, 1, 5.0)).unwrap();
        assert_eq!(sched.state(a), Some(ProcessState::Runnable));

        let mut log = HoldLog::new();
        sched.step(SimTime(100.0), &mut log).unwrap(); // a requests → granted
        sched.step(SimTime(100.0), &mut log).unwrap(); // b requests → queued
        assert_eq!(sched.state(a), Some(ProcessState::Waiting));
        assert_eq!(sched.state(b), Some(ProcessState::Waiting));
        assert_eq!(sched.pool(pool).unwrap().queue_len(), 1);

        sched.run_until(SimTime(100.0), &mut log).unwrap();
        assert_eq!(sched.state(a), Some(ProcessState::Terminated));
        assert_eq!(sched.state(ProcessId(99)), None);
    }

    #[test]
    fn exit_while_holding_is_reclaimed_and_counted() {
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        let pool = sched.add_pool("tables", 1).unwrap();
        sched.spawn(Leaker { pool, stage: 0 }).unwrap();
        sched.spawn(Holder::new(7, pool, 1, 1.0)).unwrap();

        let mut log = HoldLog::new();
        sched.run_until(SimTime(100.0), &mut log).unwrap();
        assert_eq!(sched.cleanup_faults(), 1);
        assert_eq!(log, vec![(7, 0.0, 1.0)]);
        assert_eq!(sched.pool(pool).unwrap().held(), 0);
    }

    #[test]
    fn terminate_cancels_pending_timer() {
        let mut sched: Scheduler<Vec<f64>> = Scheduler::new();
        let pid = sched.spawn(Ticker { period: 2.0 }).unwrap();
        let mut log = Vec::new();
        sched.run_until(SimTime(3.0), &mut log).unwrap();
        sched.terminate(pid).unwrap();
        assert_eq!(sched.pending_events(), 0);
        sched.run_until(SimTime(100.0), &mut log).unwrap();
        assert_eq!(log, vec![0.0, 2.0]);
        assert!(matches!(sched.terminate(pid), Err(DesError::UnknownProcess(_))));
    }

    #[test]
    fn terminate_waiter_passes_grant_on() {
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        let pool = sched.add_pool("kitchen", 1).unwrap();
        sched.spawn(Holder::new(1, pool, 1, 4.0)).unwrap();
        let quitter = sched.spawn(Holder::new(2, pool, 1, 4.0)).unwrap();
        sched.spawn(Holder::new(3, pool, 1, 4.0)).unwrap();

        let mut log = HoldLog::new();
        sched.run_until(SimTime(1.0), &mut log).unwrap();
        sched.terminate(quitter).unwrap();
        sched.run_until(SimTime(100.0), &mut log).unwrap();
        assert_eq!(log, vec![(1, 0.0, 4.0), (3, 4.0, 8.0)]);
    }

    #[test]
    fn unknown_pool_aborts_run() {
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        sched.spawn(Holder::new(1, PoolId(5), 1, 1.0)).unwrap();
        let err = sched.run_until(SimTime(10.0), &mut HoldLog::new()).unwrap_err();
        assert!(matches!(err, DesError::UnknownPool(PoolId(5))));
    }

    #[test]
    fn oversized_request_aborts_run() {
        let mut sched: Scheduler<HoldLog> = Scheduler::new();
        let pool = sched.add_pool("kitchen", 1).unwrap();
        sched.spawn(Holder::new(1, pool, 2, 1.0)).unwrap();
        let err = sched.run_until(SimTime(10.0), &mut HoldLog::new()).unwrap_err();
        assert!(matches!(err, DesError::ExceedsCapacity { .. }));
    }

    #[test]
    fn identical_setups_fire_identically() {
        let run = || {
            let mut sched: Scheduler<HoldLog> = Scheduler::new();
            let pool = sched.add_pool("kitchen", 2).unwrap();
            for i in 0..12 {
                sched.spawn(Holder::new(i, pool, 1, 1.5 * (i % 5 + 1) as f64)).unwrap();
            }
            let mut log = HoldLog::new();
            sched.run_until(SimTime(500.0), &mut log).unwrap();
            (log, sched.events_fired())
        };
        assert_eq!(run(), run());
    }
}
