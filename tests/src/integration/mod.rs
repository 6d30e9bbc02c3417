pub mod loopback;

mod flows;
mod versions;
