use eyre::Result;

use poshan_sources::Sources;

/// Fetch all the different sources available.
///
pub fn list_sources(srcs: &Sources) -> Result<String> {
    srcs.list()
}
