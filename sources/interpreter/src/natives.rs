use std::collections::HashMap;

use support::types::MethodKey;

use crate::{frames::Frame, mtable::GMeth, value::Value};

/// Host stand-ins for the `java/io/PrintStream` println family. Loaded into
/// the method table at startup; each consumes its argument slots and writes
/// to the host's stdout.
pub fn load_print_stream() -> HashMap<String, GMeth> {
    let mut methods = HashMap::new();

    let println_1 = GMeth {
        param_slots: 1,
        func: println,
    };

    for descriptor in ["(Ljava/lang/String;)V", "(I)V", "(J)V", "(D)V", "(Z)V"] {
        methods.insert(
            MethodKey::new("java/io/PrintStream", "println", descriptor).to_string(),
            println_1.clone(),
        );
    }

    methods.insert(
        MethodKey::new("java/io/PrintStream", "println", "()V").to_string(),
        GMeth {
            param_slots: 0,
            func: println,
        },
    );

    methods
}

fn println(_frame: &mut Frame, args: Vec<Value>) {
    if args.is_empty() {
        println!();
        return;
    }

    for value in &args {
        println!("{value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_provides_the_println_family() {
        let lib = load_print_stream();

        let with_string = lib
            .get("java/io/PrintStream.println(Ljava/lang/String;)V")
            .unwrap();
        assert_eq!(with_string.param_slots, 1);

        let bare = lib.get("java/io/PrintStream.println()V").unwrap();
        assert_eq!(bare.param_slots, 0);
    }
}
