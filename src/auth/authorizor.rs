use oso::{Oso, PolarClass};

use crate::auth::{Collection, User};
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(User::get_polar_class())?;
    o.register_class(Collection::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}
