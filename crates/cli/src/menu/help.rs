//! Definitions shown on the help screen.

pub const HELP_TITLE: &str = "HELP DEFINITIONS";

pub const HELP_ENTRIES: [(&str, &str); 7] = [
    (
        "Key/Secret",
        "The AWS key and secret used for API access to your AWS environment. \
         Elevated permissions are suggested. Leave both empty to use the default AWS credential chain.",
    ),
    (
        "Token",
        "If you are given rotating session credentials you will need to enter a session token here. \
         It is not needed for the access keys of a static IAM user.",
    ),
    (
        "Lambda",
        "List, Clone and Upgrade Lambda functions. Upgrade moves the selected functions to the target runtime. \
         Clone + Upgrade does both in one shot, which is useful for cloning functions on unsupported runtimes.",
    ),
    ("Glue", "Glue jobs are listed here for a future release."),
    (
        "New Text",
        "Text added to the name of every function you clone. It is appended to the original name and is \
         mandatory so a clone never reuses the original name. Use Replace Text for more control.",
    ),
    (
        "Replace Text",
        "Text to remove and replace with New Text, wherever it occurs in the name. If it is empty or not \
         found, New Text is appended to the end of the name instead.",
    ),
    (
        "Keys",
        "Arrows move, enter selects, esc goes back, space toggles a function, / filters a list, q quits.",
    ),
];
