use crate::error::{Result, ZregError};

/// How pages of one acquisition file interleave fast-z slices and channels.
///
/// Pages cycle through `fast_z_slices` buckets of `channels` pages each, so
/// channel `c` of bucket `z` lives at pages `z * channels + c`, stepping by
/// `fast_z_slices * channels`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcquisitionLayout {
    pub channels: usize,
    pub fast_z_slices: usize,
    pub fast_z_slice: usize,
}

/// Page indices selected for one channel of the configured bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketFrames {
    pub pages: Vec<usize>,
    /// The bucket held a single frame, so the warm-up frame was kept.
    pub warmup_retained: bool,
}

impl BucketFrames {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }
}

impl AcquisitionLayout {
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(ZregError::InvalidConfig(
                "at least one channel is required".into(),
            ));
        }
        if self.fast_z_slices == 0 {
            return Err(ZregError::InvalidConfig(
                "fast_z_slices must be at least 1".into(),
            ));
        }
        if self.fast_z_slice >= self.fast_z_slices {
            return Err(ZregError::InvalidConfig(format!(
                "fast_z_slice {} is outside 0..{}",
                self.fast_z_slice, self.fast_z_slices
            )));
        }
        Ok(())
    }

    pub fn stride(&self) -> usize {
        self.fast_z_slices * self.channels
    }

    /// Every page of `channel` in the configured bucket, warm-up included.
    pub fn bucket_pages(&self, channel: usize, page_count: usize) -> Vec<usize> {
        let start = self.fast_z_slice * self.channels + channel;
        (start..page_count).step_by(self.stride()).collect()
    }

    /// Pages of `channel` after discarding the warm-up frame. A bucket with a
    /// single frame keeps it.
    pub fn usable_frames(&self, channel: usize, page_count: usize) -> BucketFrames {
        let mut pages = self.bucket_pages(channel, page_count);
        let warmup_retained = pages.len() == 1;
        if pages.len() > 1 {
            pages.remove(0);
        }
        BucketFrames {
            pages,
            warmup_retained,
        }
    }
}
