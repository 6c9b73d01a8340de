/*! Integration tests for jotdb.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - session: open/init/close lifecycle, the version gate, readonly mode
 * - map_operations: map views, insertion order, key removal
 * - list_operations: list views, end operations, value scans, cells
 * - references: lazy resolution, invalidation, materialization, equality
 * - backend: file persistence of the bundled InMemory backend
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("jotdb=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod backend;
mod helpers;
mod list_operations;
mod map_operations;
mod references;
