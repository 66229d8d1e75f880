mod controller;
mod messages;
mod poller;

pub use {
    controller::{WatchController, WatchSetup},
    messages::{Command, EngineEvent, PollStatus},
    poller::{LivePoller, PollerState},
};
