use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// How far the cursor scans linearly before falling back to binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe interval a track was sampled in.
///
/// Playback usually advances by less than one keyframe per frame, so
/// starting the search from the previous interval is O(1) in practice.
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// For `CubicSpline` the layout is `[in_tangent, value, out_tangent]`
    /// per keyframe, so the length is `times.len() * 3`.
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Number of keyframes the value buffer can actually serve.
    fn frame_count(&self) -> usize {
        let per_frame = match self.interpolation {
            InterpolationMode::CubicSpline => 3,
            _ => 1,
        };
        self.times.len().min(self.values.len() / per_frame)
    }

    /// Time of the last keyframe, or 0 for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples without a cursor. Returns `None` for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let len = self.frame_count();
        if len == 0 {
            return None;
        }
        let next_idx = self.times[..len].partition_point(|&t| t <= time);
        Some(self.sample_at_frame(next_idx.saturating_sub(1), time, len))
    }

    /// Samples starting the keyframe search at `cursor`, then updates it.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.frame_count();
        if len == 0 {
            return None;
        }
        if len == 1 {
            return Some(self.value_at(0));
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found = if time >= t_curr {
            // Forward playback
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    res = Some(len - 1);
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Loop wrap or reset
            let mut res = None;
            for offset in 1..=MAX_SCAN_OFFSET {
                if i < offset {
                    break;
                }
                let idx = i - offset;
                if time >= self.times[idx] {
                    res = Some(idx);
                    break;
                }
            }
            res
        };

        let index = found.unwrap_or_else(|| {
            self.times[..len]
                .partition_point(|&t| t <= time)
                .saturating_sub(1)
        });
        cursor.last_index = index;

        Some(self.sample_at_frame(index, time, len))
    }

    fn value_at(&self, index: usize) -> T {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values[index * 3 + 1],
            _ => self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32, len: usize) -> T {
        if index >= len - 1 {
            return self.value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index),
            InterpolationMode::Linear => {
                T::interpolate_linear(self.value_at(index), self.value_at(next_idx), t)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;
                T::interpolate_cubic(
                    self.values[i_prev + 1],
                    self.values[i_prev + 2],
                    self.values[i_next],
                    self.values[i_next + 1],
                    t,
                    dt,
                )
            }
        }
    }
}
