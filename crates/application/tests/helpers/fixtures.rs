#![allow(dead_code)]

use dnstree_domain::{
    Acl, AclEntry, DnsServer, DnsServerSet, GlobalOption, RecordData, ResourceRecord,
    ServerSetAssignment, ServerSetViewAssignment, SoaData, View, ViewAclAssignment, ViewScope,
    Zone, ZoneType,
};
use std::sync::Arc;

use super::Model;

pub const ZONE: &str = "sub.university.edu";
pub const VIEW: &str = "test_view";
pub const SET: &str = "set1";
pub const ZONE_FILE: &str = "set1_servers/named/test_view/sub.university.edu.db";

pub fn soa(zone: &str, view: ViewScope, serial: u32) -> ResourceRecord {
    ResourceRecord::new(
        zone,
        view,
        "@",
        3600,
        RecordData::Soa(SoaData {
            name_server: Arc::from("ns.university.edu."),
            admin_email: Arc::from("hostmaster.ns.university.edu."),
            serial_number: serial,
            refresh_seconds: 10800,
            retry_seconds: 3600,
            expiry_seconds: 3600000,
            minimum_seconds: 86400,
        }),
    )
}

pub fn a(zone: &str, view: ViewScope, target: &str, ip: &str) -> ResourceRecord {
    ResourceRecord::new(
        zone,
        view,
        target,
        3600,
        RecordData::A {
            assignment_ip: ip.parse().unwrap(),
        },
    )
}

fn record(target: &str, data: RecordData) -> ResourceRecord {
    ResourceRecord::new(ZONE, ViewScope::concrete(VIEW), target, 3600, data)
}

/// The seventeen records of `sub.university.edu` as seen from `test_view`.
pub fn university_records() -> Vec<ResourceRecord> {
    let view = || ViewScope::concrete(VIEW);
    vec![
        soa(ZONE, view(), 811),
        record(
            "@",
            RecordData::Ns {
                name_server: Arc::from("ns.sub.university.edu."),
            },
        ),
        record(
            "@",
            RecordData::Ns {
                name_server: Arc::from("ns2.sub.university.edu."),
            },
        ),
        record(
            "@",
            RecordData::Mx {
                priority: 10,
                mail_server: Arc::from("mail1.sub.university.edu."),
            },
        ),
        record(
            "@",
            RecordData::Mx {
                priority: 20,
                mail_server: Arc::from("mail2.sub.university.edu."),
            },
        ),
        record(
            "@",
            RecordData::Txt {
                quoted_text: Arc::from("\"Contact 1:  Stephen Harrell (sharrell@university.edu)\""),
            },
        ),
        a(ZONE, view(), "computer1", "192.168.1.1"),
        a(ZONE, view(), "computer2", "192.168.1.2"),
        a(ZONE, view(), "computer3", "192.168.1.5"),
        a(ZONE, view(), "desktop-1", "192.168.1.100"),
        a(ZONE, view(), "mail1", "192.168.1.101"),
        a(ZONE, view(), "mail2", "192.168.1.102"),
        a(ZONE, view(), "ns", "192.168.1.103"),
        a(ZONE, view(), "ns2", "192.168.1.104"),
        record(
            "desktop-1",
            RecordData::Aaaa {
                assignment_ip: "3ffe:800:0:0:0:0:0:1".parse().unwrap(),
            },
        ),
        record(
            "www",
            RecordData::Cname {
                assignment_host: Arc::from("sub.university.edu."),
            },
        ),
        record(
            "computer1",
            RecordData::Hinfo {
                hardware: Arc::from("Pentium"),
                os: Arc::from("\"RedHat Linux\""),
            },
        ),
    ]
}

/// One view, one master zone with seventeen records, one server set with
/// one server and an options block.
pub fn university_model() -> Model {
    Model {
        views: vec![View::new(VIEW)],
        zones: vec![Zone::new(
            ZONE,
            ViewScope::concrete(VIEW),
            "sub.university.edu.",
            ZoneType::Master,
            "",
        )],
        records: university_records(),
        acls: Vec::new(),
        view_acl_assignments: Vec::new(),
        servers: vec![DnsServer {
            name: Arc::from("dns1"),
        }],
        server_sets: vec![DnsServerSet::new(SET)],
        server_set_assignments: vec![ServerSetAssignment {
            server: Arc::from("dns1"),
            server_set: Arc::from(SET),
        }],
        server_set_view_assignments: vec![ServerSetViewAssignment {
            server_set: Arc::from(SET),
            view: Arc::from(VIEW),
            order: 1,
            options: Arc::from(""),
        }],
        global_options: vec![GlobalOption {
            server_set: Arc::from(SET),
            label: Arc::from("#options"),
            options: Arc::from("options {\n\tdirectory \"/var/domain\";\n\trecursion no;\n};"),
        }],
    }
}

/// Adds a second server set `set2` serving `internal` and `external` views,
/// `internal` restricted to the `private` ACL.
pub fn add_two_view_set(model: &mut Model, internal_order: u32, external_order: u32) {
    for name in ["internal", "external"] {
        model.views.push(View::new(name));
    }
    model.acls.push(Acl::new(
        "private",
        vec![
            AclEntry::parse("10.0.0.0/8", true).unwrap(),
            AclEntry::parse("10.66.0.0/16", false).unwrap(),
        ],
    ));
    model.view_acl_assignments.push(ViewAclAssignment {
        view: Arc::from("internal"),
        server_set: Arc::from("set2"),
        acl: Arc::from("private"),
        order: 1,
    });
    model.servers.push(DnsServer {
        name: Arc::from("dns2"),
    });
    model.server_sets.push(DnsServerSet::new("set2"));
    model.server_set_assignments.push(ServerSetAssignment {
        server: Arc::from("dns2"),
        server_set: Arc::from("set2"),
    });
    for (view, order) in [("internal", internal_order), ("external", external_order)] {
        model
            .server_set_view_assignments
            .push(ServerSetViewAssignment {
                server_set: Arc::from("set2"),
                view: Arc::from(view),
                order,
                options: Arc::from(""),
            });
    }

    model.zones.push(Zone::new(
        "university.edu",
        ViewScope::AnyView,
        "university.edu.",
        ZoneType::Master,
        "",
    ));
    model
        .records
        .push(soa("university.edu", ViewScope::AnyView, 100));
    model.records.push(a(
        "university.edu",
        ViewScope::AnyView,
        "www",
        "198.51.100.10",
    ));
}
