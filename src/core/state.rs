use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use serde::Serialize;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

// Index into the process Vec
pub type ProcessId = usize;
// User-visible process identifier from the workload
pub type Pid = u64;
pub type Ticks = u64;
pub type Priority = u32;
new_key_type! {
    pub struct RqId;
}

/// Ordering key for a priority-ordered ready pool.
///
/// `key` is the policy's sort key (remaining time, priority). Ties fall back
/// to `seq`, the order in which processes were admitted, so selection matches
/// a stable sort of the pool in admission order.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct RqKey {
    pub key: u64,
    pub seq: u64,
}

impl RqKey {
    pub fn new(key: u64, seq: u64) -> Self {
        Self { key, seq }
    }
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop RqKey's Ord
impl PartialOrd for RqKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RqKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    // Not yet arrived, or arrived but not yet admitted
    Pending,
    Ready,
    Running,
    Completed,
}

/// Per-run bookkeeping for one simulated process.
#[derive(Debug, Clone, Serialize)]
pub struct Process {
    #[serde(skip)]
    pub id: ProcessId,
    pub pid: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: Priority,
    pub remaining_time: Ticks,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub state: ProcessState,
    #[serde(skip)]
    pub admit_seq: Option<u64>,
}

impl Process {
    pub fn new(
        id: ProcessId,
        pid: Pid,
        arrival_time: Ticks,
        burst_time: Ticks,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            pid,
            arrival_time,
            burst_time,
            priority,
            remaining_time: burst_time,
            start_time: None,
            completion_time: None,
            state: ProcessState::Pending,
            admit_seq: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.completion_time
            .map(|completion| completion - self.arrival_time)
    }

    pub fn waiting_time(&self) -> Option<Ticks> {
        self.turnaround_time()?.checked_sub(self.burst_time)
    }

    // Time to first run
    pub fn response_time(&self) -> Option<Ticks> {
        self.start_time.map(|start| start - self.arrival_time)
    }
}

#[derive(Debug)]
pub enum Rq {
    Fifo {
        procs: VecDeque<ProcessId>,
    },
    Priq {
        procs: KeyedPriorityQueue<ProcessId, RqKey>,
    },
}

impl Rq {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            procs: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        match self {
            Self::Fifo { procs } => procs.contains(&id),
            Self::Priq { procs } => procs.iter().any(|p| *p.0 == id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { procs } => procs.len(),
            Self::Priq { procs } => procs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one policy run mutates: the clock, the record set, and the
/// ready structures the policy created.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub current: Option<ProcessId>,
    pub processes: Vec<Process>,
    pub rqs: SlotMap<RqId, Rq>,
    pub proc_to_rq: FxHashMap<ProcessId, RqId>,

    // Increment upon admission
    next_seq: u64,
}

impl SimCtx {
    pub fn new(processes: Vec<Process>) -> Self {
        for (index, process) in processes.iter().enumerate() {
            debug_assert_eq!(process.id, index, "ProcessId must match Vec index");
            debug_assert_eq!(
                process.state,
                ProcessState::Pending,
                "Process {} must start Pending",
                process.pid
            );
        }

        Self {
            now: 0,
            current: None,
            processes,
            rqs: SlotMap::with_key(),
            proc_to_rq: FxHashMap::default(),
            next_seq: 0,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_rq_fifo(&mut self) -> RqId {
        self.rqs.insert(Rq::new_fifo())
    }

    pub fn create_rq_priq(&mut self) -> RqId {
        self.rqs.insert(Rq::new_priq())
    }

    fn rq_push(&mut self, rq_id: RqId, id: ProcessId, key: Option<RqKey>) {
        assert!(
            !self.proc_to_rq.contains_key(&id),
            "Process {id} already present in some ready queue"
        );

        let process = self.process(id);
        debug_assert!(
            process.state == ProcessState::Ready,
            "Process {} must be Ready when enqueued, found {:?}",
            process.pid,
            process.state
        );

        let rq = self.rqs.get_mut(rq_id).expect("Unknown ready queue");
        match rq {
            Rq::Fifo { procs } => procs.push_back(id),
            Rq::Priq { procs } => {
                procs.push(
                    id,
                    key.expect("Attempted to push to a priority ready queue with no key"),
                );
            }
        };

        self.proc_to_rq.insert(id, rq_id);
    }

    pub fn rq_push_fifo(&mut self, rq_id: RqId, id: ProcessId) {
        self.rq_push(rq_id, id, None);
    }

    /// Push onto an ordered pool keyed by `key`, tie-broken by admission order.
    pub fn rq_push_priq(&mut self, rq_id: RqId, id: ProcessId, key: u64) {
        let seq = self
            .process(id)
            .admit_seq
            .expect("Enqueued process must have been admitted");
        self.rq_push(rq_id, id, Some(RqKey::new(key, seq)));
    }

    pub fn rq_pop(&mut self, rq_id: RqId) -> Option<ProcessId> {
        let rq = self.rqs.get_mut(rq_id)?;
        let id = match rq {
            Rq::Fifo { procs } => procs.pop_front(),
            Rq::Priq { procs } => procs.pop().map(|p| p.0),
        }?;

        let removed = self.proc_to_rq.remove(&id);
        debug_assert!(removed.is_some(), "Process {id} missing ready queue membership");

        Some(id)
    }

    pub fn rq_is_empty(&self, rq_id: RqId) -> bool {
        self.rqs.get(rq_id).is_none_or(Rq::is_empty)
    }

    pub fn process_in_any_rq(&self, id: ProcessId) -> bool {
        self.proc_to_rq.contains_key(&id)
    }

    pub fn process(&self, id: ProcessId) -> &Process {
        &self.processes[id]
    }

    pub fn process_mut(&mut self, id: ProcessId) -> &mut Process {
        &mut self.processes[id]
    }

    // Return previous state (Pending on first admission, Running on requeue)
    pub fn mark_ready(&mut self, id: ProcessId) -> ProcessState {
        let seq = self.next_seq;
        let process = self.process_mut(id);
        debug_assert!(
            process.state != ProcessState::Completed,
            "Completed process {} cannot be ready",
            process.pid
        );

        let prev_state = process.state;
        if process.admit_seq.is_none() {
            process.admit_seq = Some(seq);
            self.next_seq += 1;
        }
        let process = self.process_mut(id);
        process.state = ProcessState::Ready;
        if self.current == Some(id) {
            self.current = None;
        }
        prev_state
    }

    // Return previous state
    pub fn set_running(&mut self, id: ProcessId) -> ProcessState {
        debug_assert!(
            !self.proc_to_rq.contains_key(&id),
            "Running process {id} must not be enqueued"
        );
        debug_assert!(
            self.current.is_none(),
            "CPU already running process {:?}",
            self.current
        );

        let now = self.now;
        self.current = Some(id);
        let process = self.process_mut(id);
        let prev_state = process.state;
        process.state = ProcessState::Running;
        if process.start_time.is_none() {
            process.start_time = Some(now);
        }
        prev_state
    }

    // Charge `ticks` of service to the running process; return what remains
    pub fn consume(&mut self, id: ProcessId, ticks: Ticks) -> Ticks {
        let process = self.process_mut(id);
        debug_assert!(
            ticks <= process.remaining_time,
            "Process {} charged {ticks} ticks with only {} remaining",
            process.pid,
            process.remaining_time
        );
        process.remaining_time = process.remaining_time.saturating_sub(ticks);
        process.remaining_time
    }

    pub fn mark_completed(&mut self, id: ProcessId, completion_time: Ticks) {
        debug_assert!(
            !self.proc_to_rq.contains_key(&id),
            "Completing process {id} that is still enqueued"
        );

        let process = &mut self.processes[id];
        debug_assert!(
            process.state == ProcessState::Running,
            "Process {} must have been running before marked complete",
            process.pid
        );
        debug_assert!(
            process.completion_time.is_none(),
            "Process {} completed twice",
            process.pid
        );

        process.state = ProcessState::Completed;
        process.remaining_time = 0;
        process.completion_time = Some(completion_time);
        self.current = None;
    }

    pub fn all_completed(&self) -> bool {
        self.processes.iter().all(Process::is_completed)
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.processes
    }
}
