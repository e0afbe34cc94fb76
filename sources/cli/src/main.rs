use std::{process::exit, rc::Rc, str::FromStr};

use clap::Parser;
use parking_lot::Mutex;
use tracing::{error, info, Level};
use tracing_subscriber::fmt;

use interpreter::{
    classloader::Loaders,
    frames::Frame,
    globals::Globals,
    interpreter::run_frame,
    mtable::{MTableEntry, MethodTable},
    thread::VmThread,
};
use parse::attributes::CodeAttribute;
use support::types::MethodKey;

use crate::args::Cli;

mod args;

const MAIN_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

fn main() {
    let args = Cli::parse();

    let level = Level::from_str(&args.log_level).unwrap_or(Level::INFO);
    let format = fmt::format()
        .with_ansi(true)
        .without_time()
        .with_level(true)
        .with_target(false)
        .compact();

    tracing_subscriber::fmt()
        .with_max_level(level)
        .event_format(format)
        .with_writer(std::io::stderr)
        .init();

    if args.classes.is_empty() {
        error!("No classes given.");
        exit(1);
    }

    let globals = Globals::new(args.vm_name.clone());
    let mut loaders = Loaders::init();

    let method_table = MethodTable::new();
    method_table.register_natives();

    info!("{} starting up", globals.vm_name);

    for path in &args.classes {
        let class_name = match loaders.application.load_from_file(path) {
            Ok(name) => name,
            Err(e) => {
                error!("could not load {path}: {e}");
                exit(1);
            }
        };
        info!("loaded {class_name} from {path}");

        // the lookup cannot miss: the loader just installed this name
        let class = loaders.application.lookup(&class_name).unwrap();

        let Some(main_index) =
            class
                .methods
                .locate_index(&class.constant_pool, "main", MAIN_DESCRIPTOR)
        else {
            error!("{class_name} has no main{MAIN_DESCRIPTOR} method");
            exit(1);
        };
        let main = &class.methods.values[main_index];

        // record the resolution so later invocations hit the method table
        method_table.insert(
            MethodKey::new(class_name.as_str(), "main", MAIN_DESCRIPTOR).to_string(),
            MTableEntry::Java {
                class_name: class_name.clone(),
                method_index: main_index,
            },
        );

        let code: CodeAttribute = match main.attributes.known_attribute(&class.constant_pool) {
            Ok(code) => code,
            Err(e) => {
                error!("{class_name}.main has no usable Code attribute: {e}");
                exit(1);
            }
        };

        let frame = Frame::from_code(&class_name, "main", &code);

        let mut thread = VmThread::create(&globals);
        thread
            .stack
            .push_front(Rc::new(Mutex::new(frame)));

        info!("entering {class_name}.main on thread {}", thread.id);
        if let Err(e) = run_frame(&globals, &mut thread.stack) {
            error!("unrecoverable error in {class_name}.main: {e}");
            exit(1);
        }

        info!("execution of {class_name}.main concluded without error");
    }
}
