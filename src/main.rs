#[macro_use]
extern crate rocket;

use scanlings_backend::rocket_initialize;

#[launch]
fn rocket() -> _ {
    rocket_initialize()
}
