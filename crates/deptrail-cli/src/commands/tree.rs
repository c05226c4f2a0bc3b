//! Handler for `deptrail tree`.

use miette::Result;

use deptrail_ops::ops_tree::{self, TreeOptions};
use deptrail_ops::WalkOptions;

pub fn exec(
    walk: WalkOptions,
    depth: Option<u32>,
    why: Option<String>,
    inverted: Option<String>,
    eclipsed: bool,
    resolved: bool,
) -> Result<()> {
    let opts = TreeOptions {
        depth: depth.map(|d| d as usize),
        why,
        inverted,
        eclipsed,
        resolved,
    };

    print!("{}", ops_tree::tree(&walk, &opts)?);
    Ok(())
}
