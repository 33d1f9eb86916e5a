//! Basic example of the ioclite container.
//!
//! Run with `RUST_LOG=ioclite_container=trace` to watch each resolution step.

use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

use ioclite::prelude::*;

// === Define your traits and types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

impl Injectable for dyn Logger {
    fn type_info() -> TypeInfo {
        TypeInfo::interface::<Self>().build()
    }
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

impl Injectable for ConsoleLogger {
    fn type_info() -> TypeInfo {
        TypeInfo::concrete::<Self>()
            .constructor(Constructor::new(|_| Ok(ConsoleLogger)))
            .implements::<dyn Logger>(|this| this)
            .build()
    }
}

trait Repository<T>: Send + Sync {
    fn find(&self, id: u64) -> String;
}

impl<T: Injectable> Injectable for dyn Repository<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::interface::<Self>()
            .generic(GenericDefinition::of::<dyn Repository<Unbound>>(), vec![T::type_info()])
            .build()
    }
}

struct SqlRepository<T> {
    logger: Arc<dyn Logger>,
    _entity: PhantomData<T>,
}

impl<T: Injectable> Repository<T> for SqlRepository<T> {
    fn find(&self, id: u64) -> String {
        let table = type_name::<T>().rsplit("::").next().unwrap_or("unknown");
        self.logger.log(&format!("SELECT * FROM {table} WHERE id = {id}"));
        format!("{table} #{id}")
    }
}

impl<T: Injectable> Injectable for SqlRepository<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::concrete::<Self>()
            .generic(GenericDefinition::of::<SqlRepository<Unbound>>(), vec![T::type_info()])
            .constructor(
                Constructor::new(|args| {
                    Ok(SqlRepository {
                        logger: args.next()?,
                        _entity: PhantomData,
                    })
                })
                .param::<dyn Logger>(),
            )
            .implements::<dyn Repository<T>>(|this| this)
            .build()
    }
}

struct Employee;
struct Invoice;

impl Injectable for Employee {
    fn type_info() -> TypeInfo {
        TypeInfo::concrete::<Self>().build()
    }
}

impl Injectable for Invoice {
    fn type_info() -> TypeInfo {
        TypeInfo::concrete::<Self>().build()
    }
}

struct InvoiceService {
    employees: Arc<dyn Repository<Employee>>,
    invoices: Arc<dyn Repository<Invoice>>,
}

impl InvoiceService {
    fn bill(&self, employee: u64, invoice: u64) -> String {
        format!("{} billed on {}", self.employees.find(employee), self.invoices.find(invoice))
    }
}

impl Injectable for InvoiceService {
    fn type_info() -> TypeInfo {
        TypeInfo::concrete::<Self>()
            .constructor(
                Constructor::new(|args| {
                    Ok(InvoiceService {
                        employees: args.next()?,
                        invoices: args.next()?,
                    })
                })
                .param::<dyn Repository<Employee>>()
                .param::<dyn Repository<Invoice>>(),
            )
            .build()
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("ioclite_container=debug")
        .init();

    // Build the container
    let mut builder = Container::builder();
    // Logger: singleton (the default)
    builder.bind::<dyn Logger>().to::<ConsoleLogger>()?;
    // Every Repository<T> is served by SqlRepository<T>, one per T
    builder
        .bind_open(GenericDefinition::of::<dyn Repository<Unbound>>())
        .to_open(GenericDefinition::of::<SqlRepository<Unbound>>())?;
    builder
        .describe::<SqlRepository<Employee>>()
        .describe::<SqlRepository<Invoice>>();
    let container = builder.build();

    println!("Container built: {container:?}");

    // InvoiceService is not bound: it is concrete, so it builds itself
    let service = container.resolve::<InvoiceService>()?;
    println!("{}", service.bill(42, 7));

    let again = container.resolve::<InvoiceService>()?;
    println!(
        "same service: {}, same employee repository: {}",
        Arc::ptr_eq(&service, &again),
        Arc::ptr_eq(&service.employees, &again.employees)
    );

    Ok(())
}
