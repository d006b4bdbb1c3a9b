use crate::commands::{bids, collections, config, nfts, users};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "users",
            groups: users::EXAMPLES,
        },
        CommandExample {
            name: "collections",
            groups: collections::EXAMPLES,
        },
        CommandExample {
            name: "nfts",
            groups: nfts::EXAMPLES,
        },
        CommandExample {
            name: "bids",
            groups: bids::EXAMPLES,
        },
        CommandExample {
            name: "config",
            groups: config::EXAMPLES,
        },
    ]
}
