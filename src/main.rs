use clap::Parser as ClapParser;
use log::error;
use parsley::adapters::Adapters;
use parsley::config::Cli;
use parsley::environment::Environment;
use parsley::interpreter::Interpreter;
use parsley::lexer::Lexer;
use parsley::parser::Parser;
use std::rc::Rc;

fn main() {
    let args = Cli::parse();
    simple_logger::init_with_level(args.verbosity.to_level()).unwrap();

    let file_content = match std::fs::read_to_string(&args.file) {
        Ok(content) => content,
        Err(e) => {
            error!("could not read file '{}': {e}", args.file.display());
            std::process::exit(1);
        }
    };

    let filename = args.file.to_string_lossy().to_string();

    let tokens = match Lexer::new(&file_content, filename.clone()).lex() {
        Ok(tokens) => tokens,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if args.dump_tokens {
        for token in &tokens {
            println!("{token:?}");
        }
        return;
    }

    let program = match Parser::new(tokens, filename.clone()).parse_program() {
        Ok(program) => program,
        Err(errors) => {
            for e in errors {
                error!("{e}");
            }
            std::process::exit(1);
        }
    };

    if args.dump_ast {
        println!("{program:#?}");
        return;
    }

    let adapters = Rc::new(Adapters::native(args.allow_read, args.allow_write, args.allow_execute));
    let global = Environment::root(filename, adapters);
    let interpreter = Interpreter::new(global);

    if let Err(e) = interpreter.run(&program) {
        error!("{e}");
        std::process::exit(1);
    }
}
