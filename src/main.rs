fn main() {
    epidemio_dashboard_lib::run()
}
