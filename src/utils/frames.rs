/// A fixed-length window into a longer signal, tagged with where it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    pub start: usize,
    pub samples: &'a [f32],
}

/// Sliding-window segmentation of a signal.
///
/// Frames start at `0, hop, 2 * hop, ...` and stop once a frame would run past the
/// end of the signal. The short tail is dropped, never padded, so a signal shorter
/// than one frame yields nothing. A clone resumes where the original stands; call
/// [`Frames::new`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    signal: &'a [f32],
    frame_size: usize,
    hop_size: usize,
    next_start: usize,
}

impl<'a> Frames<'a> {
    pub fn new(signal: &'a [f32], frame_size: usize, hop_size: usize) -> Self {
        Frames {
            signal,
            frame_size,
            hop_size,
            next_start: 0,
        }
    }

    /// Number of frames a full pass produces.
    pub fn count_frames(signal_len: usize, frame_size: usize, hop_size: usize) -> usize {
        if frame_size == 0 || hop_size == 0 || signal_len < frame_size {
            return 0;
        }
        (signal_len - frame_size) / hop_size + 1
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        if self.frame_size == 0 || self.hop_size == 0 {
            return None;
        }
        let start = self.next_start;
        let stop = start.checked_add(self.frame_size)?;
        if stop > self.signal.len() {
            return None;
        }
        self.next_start = start.saturating_add(self.hop_size);
        Some(Frame {
            start,
            samples: &self.signal[start..stop],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.signal.len().checked_sub(self.next_start) {
            Some(len) => Frames::count_frames(len, self.frame_size, self.hop_size),
            None => 0,
        };
        (remaining, Some(remaining))
    }
}
