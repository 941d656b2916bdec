//! User-facing text.

pub const INVALID_INPUT: &str = "Invalid input";
pub const OPERATION_FAILED: &str = "Operation failed";

pub const OS_HELP: &str = "\
OS Commands:
----------------
os --EOL         : get End-Of-Line
os --cpus        : get host machine CPUs info
os --homedir     : get home directory
os --username    : get current system user name
os --architecture: get CPU architecture";

pub fn greeting(username: &str) -> String {
    format!("Welcome to the File Manager, {username}!")
}

pub fn goodbye(username: &str) -> String {
    format!("Thank you for using File Manager, {username}, goodbye!")
}

pub fn location(dir: &str) -> String {
    format!("You are currently in {dir}")
}

pub struct CommandHelp {
    pub name: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp { name: "add", usage: "add <path>" },
    CommandHelp { name: "cat", usage: "cat <path>" },
    CommandHelp { name: "cd", usage: "cd <path>" },
    CommandHelp { name: "compress", usage: "compress <src> <dest>" },
    CommandHelp { name: "cp", usage: "cp <src> <dir>" },
    CommandHelp { name: "decompress", usage: "decompress <src> <dest>" },
    CommandHelp { name: "exit", usage: "exit" },
    CommandHelp { name: "hash", usage: "hash <path>" },
    CommandHelp { name: "ls", usage: "ls" },
    CommandHelp { name: "mv", usage: "mv <src> <dir>" },
    CommandHelp { name: "os", usage: "os --<flag>" },
    CommandHelp { name: "rm", usage: "rm <path>" },
    CommandHelp { name: "rn", usage: "rn <old> <new>" },
    CommandHelp { name: "up", usage: "up" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_embed_values() {
        assert_eq!(greeting("ada"), "Welcome to the File Manager, ada!");
        assert_eq!(
            goodbye("ada"),
            "Thank you for using File Manager, ada, goodbye!"
        );
        assert_eq!(location("/home/ada"), "You are currently in /home/ada");
    }

    #[test]
    fn commands_are_sorted() {
        let names: Vec<&str> = COMMANDS.iter().map(|c| c.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
