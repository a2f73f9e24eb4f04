use foundation::time::Time;

/// Per-frame render tick.
///
/// The animation sampler reads one `Frame` per tick; everything it needs to
/// evaluate positions is derived from `time`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Session time at this frame.
    pub time: Time,
}

impl Frame {
    /// Fixed-step frame, `time = index * dt_s`.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time,
        }
    }

    /// Next frame at a measured time; `dt_s` is clamped at zero if the clock
    /// went backwards.
    pub fn advance_to(self, time: Time) -> Self {
        Self {
            index: self.index + 1,
            dt_s: time.since(self.time),
            time,
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}
