//! Decode many files at once.
//!
//! Files are independent, so with the `parallel` feature they are spread
//! over the Rayon global pool. Without it they are decoded one after the
//! other. Either way results come back in input order.

use std::path::{Path, PathBuf};

use crate::{parse_file, Error, Match};

pub type BatchResult = (PathBuf, Result<Match, Error>);

pub fn parse_files<P>(paths: &[P]) -> Vec<BatchResult>
where
    P: AsRef<Path> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        paths.par_iter().map(|p| decode_one(p.as_ref())).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        paths.iter().map(|p| decode_one(p.as_ref())).collect()
    }
}

fn decode_one(path: &Path) -> BatchResult {
    let result = parse_file(path);
    if let Err(e) = &result {
        tracing::warn!(path = %path.display(), error = %e, "decode failed");
    }
    (path.to_path_buf(), result)
}
