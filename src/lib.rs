//! A translator from the stack based VM language of the Nand2Tetris course into Hack assembly.
//!
//! Currently this crate provides the functionality to:
//! - Read `.vm` files and classify their commands.
//! - Translate the arithmetic/logical and memory access commands into Hack assembly.
//! - Assemble Hack assembly into machine words.
//! - Execute machine words on an emulated Hack computer, for checking the translation.
//!
//! Branching and function calling commands are recognized but not translated.
//!
//! # Example
//! ```
//! use hackvm::{
//!     translator::Translator,
//!     hack::Program,
//!     emulator::{Emulator, SP, STACK_BASE},
//! };
//!
//! // Adds 7 and 8 together, leaving the result on the stack.
//! let vm_source = r#"
//!     // SimpleAdd.vm
//!     push constant 7
//!     push constant 8
//!     add
//! "#;
//!
//! // Translate the VM commands into Hack assembly.
//! let asm = Translator::new()
//!     .file_name("SimpleAdd")
//!     .translate_str(vm_source)
//!     .expect("could not translate the program");
//!
//! // Assemble the output into machine words.
//! let program = Program::parse(&asm)
//!     .expect("translator produced invalid assembly");
//!
//! // Load the words into an emulator with the stack pointer at its usual base.
//! let mut emulator = Emulator::new(&program);
//! emulator.set_data(SP, STACK_BASE as i16).unwrap();
//!
//! emulator.run(1000)
//!     .expect("an error occured while emulating the program");
//!
//! assert_eq!(emulator.get_data(SP), Ok(257));
//! assert_eq!(emulator.stack(), &[15]);
//! ```
//!
//! # Executables
//!
//! Both are built with the `tools` feature.
//!
//! ## `hackvm-translate`
//!
//! Translates a `.vm` file into a `.asm` file next to it.
//!
//! ```text
//! $ hackvm-translate StackTest.vm
//! $ hackvm-translate BasicTest.vm -o out/BasicTest.asm --verbose
//! ```
//!
//! ## `hackvm-run`
//!
//! Translates (if needed), assembles and executes a program, then prints the stack.
//!
//! ```text
//! $ hackvm-run BasicTest.vm --set 1=300 --set 2=400 --set 3=3000 --set 4=3010
//! SP = 257
//! stack: [472]
//! ```
pub mod error;
pub mod source;
pub mod vm;
pub mod codegen;
pub mod translator;
pub mod hack;
pub mod source_map;
pub mod emulator;
pub mod event;

pub use error::{Error, ErrorKind, Result};
pub use translator::{translate, Translator};
