/// Display version information
pub fn execute() {
    println!("sigil {}", env!("CARGO_PKG_VERSION"));
    println!("Client CLI for a remote notary signing service");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_execute() {
        // Version command should not panic
        execute();
    }
}
