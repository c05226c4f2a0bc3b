//! Handler for `deptrail resolve`.

use miette::Result;

use deptrail_ops::ops_resolve;
use deptrail_ops::WalkOptions;

pub fn exec(walk: WalkOptions, json: bool) -> Result<()> {
    let outcome = ops_resolve::resolve(&walk)?;
    if json {
        println!("{}", ops_resolve::render_json(&outcome)?);
    } else {
        print!("{}", ops_resolve::render_text(&outcome));
    }
    Ok(())
}
