use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use jdwp::{
    client::{ClientConfig, ClientError, JdwpClient},
    codec::{FieldTrace, TraceDirection, Tracer},
    spec::{
        event::{Composite, Event},
        thread_group_reference::{self, ChildrenReply},
        thread_reference,
        virtual_machine::{IDSizeInfo, IDSizes, Version, VersionReply},
        Command, ErrorCode, JdwpId, Packet, PacketHeader, PacketMeta, SuspendPolicy, ThreadID,
    },
};

mod common;

use common::{loopback, MockVm, Result};

const TIMEOUT: Duration = Duration::from_secs(5);

fn thread_id(raw: u64) -> ThreadID {
    ThreadID::from_raw(raw)
}

fn connect() -> Result<(JdwpClient, MockVm)> {
    let (stream, vm) = loopback()?;
    let config = ClientConfig {
        id_sizes: Some(vm.id_sizes),
        ..ClientConfig::default()
    };
    Ok((JdwpClient::from_stream_with_config(stream, config)?, vm))
}

fn version_reply() -> VersionReply {
    VersionReply {
        description: "mock".into(),
        version_major: 17,
        version_minor: 0,
        vm_version: "17".into(),
        vm_name: "mock VM".into(),
    }
}

#[test]
fn error_reply_skips_the_body() -> Result {
    let (client, mut vm) = connect()?;

    let pending = client.enqueue(&thread_reference::Name::new(thread_id(1)))?;
    let request = vm.read_packet()?;
    assert_eq!(
        request.header.meta(),
        PacketMeta::Command(thread_reference::Name::ID)
    );

    // a body that would not decode as a String, it must not be looked at
    vm.send(&Packet {
        header: PacketHeader::new(
            PacketHeader::JDWP_SIZE + 3,
            request.header.id(),
            PacketMeta::Reply(35),
        ),
        body: vec![0xff, 0xff, 0xff],
    })?;

    let err = pending.wait().unwrap_err();
    assert!(matches!(err, ClientError::HostError { code: 35, .. }), "{err:?}");
    assert_eq!(err.error_code(), Some(ErrorCode::InvalidSlot));
    assert!(!err.is_fatal());

    // the connection survives a failed command
    let pending = client.enqueue(&Version)?;
    let request = vm.read_packet()?;
    vm.reply(request.header.id(), &version_reply())?;
    assert_eq!(pending.wait()?, version_reply());
    assert!(!client.is_closed());
    Ok(())
}

#[test]
fn unknown_error_codes_reach_the_caller() -> Result {
    let (client, mut vm) = connect()?;

    let pending = client.enqueue(&Version)?;
    let request = vm.read_packet()?;
    vm.send(&Packet::error(request.header.id(), 9999))?;

    let err = pending.wait().unwrap_err();
    assert!(matches!(err, ClientError::HostError { code: 9999, .. }));
    assert_eq!(err.error_code(), None);
    assert_eq!(
        err.to_string(),
        "VirtualMachine.Version (1.1) failed with unknown error 9999"
    );
    Ok(())
}

#[test]
fn replies_out_of_order() -> Result {
    let (client, mut vm) = connect()?;

    let pending = (1..=3)
        .map(|n| client.enqueue(&thread_reference::Name::new(thread_id(n))))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut requests = (0..3).map(|_| vm.read_packet()).collect::<Result<Vec<_>>>()?;
    let ids = requests.iter().map(|r| r.header.id()).collect::<Vec<_>>();
    assert!(ids.windows(2).all(|w| w[0] < w[1]), "{ids:?}");

    requests.reverse();
    for request in requests {
        let command = request.decode_body::<thread_reference::Name>(vm.id_sizes, None)?;
        vm.reply(request.header.id(), &format!("thread-{}", command.thread.raw()))?;
    }

    for (n, pending) in (1..=3).zip(pending) {
        assert_eq!(pending.wait()?, format!("thread-{n}"));
    }
    Ok(())
}

#[test]
fn concurrent_callers() -> Result {
    let (client, mut vm) = connect()?;

    thread::scope(|s| -> Result {
        let callers = (1..=4)
            .map(|n| {
                let client = &client;
                s.spawn(move || client.send(thread_reference::Name::new(thread_id(n))))
            })
            .collect::<Vec<_>>();

        let mut requests = (0..4).map(|_| vm.read_packet()).collect::<Result<Vec<_>>>()?;
        requests.reverse();
        for request in requests {
            let command = request.decode_body::<thread_reference::Name>(vm.id_sizes, None)?;
            vm.reply(request.header.id(), &format!("thread-{}", command.thread.raw()))?;
        }

        for (n, caller) in (1..=4).zip(callers) {
            let name = caller.join().map_err(|_| "caller panicked")??;
            assert_eq!(name, format!("thread-{n}"));
        }
        Ok(())
    })
}

#[test]
fn reply_to_unknown_request_kills_the_connection() -> Result {
    let (client, mut vm) = connect()?;

    let pending = client.enqueue(&Version)?;
    vm.read_packet()?;
    vm.reply(999, &version_reply())?;

    let err = pending.wait().unwrap_err();
    assert!(matches!(err, ClientError::Disconnected), "{err:?}");
    assert!(err.is_fatal());
    assert!(client.is_closed());
    assert!(matches!(client.enqueue(&Version), Err(ClientError::Disconnected)));
    Ok(())
}

#[test]
fn undecodable_reply_closes_the_client() -> Result {
    let (client, mut vm) = connect()?;

    let pending = client.enqueue(&thread_reference::Name::new(thread_id(1)))?;
    let request = vm.read_packet()?;
    // claims 5 characters, carries 1
    vm.send(&Packet {
        header: PacketHeader::new(
            PacketHeader::JDWP_SIZE + 5,
            request.header.id(),
            PacketMeta::Reply(0),
        ),
        body: vec![0, 0, 0, 5, b'a'],
    })?;

    let err = pending.wait().unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }), "{err:?}");
    assert!(err.is_fatal());
    assert!(client.is_closed());
    Ok(())
}

#[test]
fn target_vm_going_away() -> Result {
    let (client, mut vm) = connect()?;

    let pending = client.enqueue(&Version)?;
    vm.read_packet()?;
    vm.close();

    assert!(matches!(pending.wait(), Err(ClientError::Disconnected)));
    assert!(client.events().recv_timeout(TIMEOUT).is_err());
    Ok(())
}

#[test]
fn events_are_delivered_without_a_request() -> Result {
    let (client, mut vm) = connect()?;

    let composite = Composite {
        suspend_policy: SuspendPolicy::All,
        events: vec![Event::ThreadStart {
            request_id: JdwpId::from_raw(3),
            thread: thread_id(7),
        }],
    };
    vm.send(&Packet::command(1, &composite, vm.id_sizes, None)?)?;

    assert_eq!(client.events().recv_timeout(TIMEOUT)?, composite);
    Ok(())
}

#[test]
fn other_commands_from_the_vm_are_ignored() -> Result {
    let (client, mut vm) = connect()?;

    vm.send(&Packet::command(1, &Version, vm.id_sizes, None)?)?;

    let pending = client.enqueue(&Version)?;
    let request = vm.read_packet()?;
    vm.reply(request.header.id(), &version_reply())?;
    assert_eq!(pending.wait()?, version_reply());
    Ok(())
}

#[test]
fn id_sizes_are_negotiated_first() -> Result {
    let (stream, mut vm) = loopback()?;
    vm.id_sizes = IDSizeInfo::uniform(4);

    let early = Composite {
        suspend_policy: SuspendPolicy::None,
        events: vec![Event::VmStart {
            request_id: None,
            thread: thread_id(0x1234),
        }],
    };

    let mock = thread::spawn({
        let early = early.clone();
        move || -> Result<MockVm> {
            let request = vm.read_packet()?;
            assert_eq!(request.header.meta(), PacketMeta::Command(IDSizes::ID));
            assert!(request.body.is_empty());

            let sizes = vm.id_sizes;
            vm.send(&Packet::command(1, &early, sizes, None)?)?;
            vm.reply(request.header.id(), &sizes)?;
            Ok(vm)
        }
    });

    let client = JdwpClient::from_stream(stream)?;
    let mut vm = mock.join().map_err(|_| "mock VM panicked")??;

    assert_eq!(client.id_sizes(), IDSizeInfo::uniform(4));
    assert_eq!(client.events().try_recv()?, early);

    // later commands use the negotiated widths
    let pending = client.enqueue(&thread_reference::Name::new(thread_id(0x1234)))?;
    let request = vm.read_packet()?;
    assert_eq!(request.body, [0, 0, 0x12, 0x34]);
    vm.reply(request.header.id(), &"main".to_owned())?;
    assert_eq!(pending.wait()?, "main");
    Ok(())
}

#[test]
fn invalid_negotiated_width() -> Result {
    let (stream, mut vm) = loopback()?;

    let mock = thread::spawn(move || -> Result<MockVm> {
        let request = vm.read_packet()?;
        vm.reply(request.header.id(), &IDSizeInfo::uniform(16))?;
        Ok(vm)
    });

    let err = JdwpClient::from_stream(stream).unwrap_err();
    let _vm = mock.join().map_err(|_| "mock VM panicked")??;
    assert!(matches!(err, ClientError::Io(_)), "{err:?}");
    Ok(())
}

#[test]
fn tracer_sees_every_field() -> Result {
    let (stream, mut vm) = loopback()?;
    let seen = Arc::new(Mutex::new(Vec::<FieldTrace>::new()));
    let config = ClientConfig {
        id_sizes: Some(vm.id_sizes),
        tracer: Some(Tracer::new({
            let seen = seen.clone();
            move |trace: &FieldTrace| seen.lock().unwrap().push(*trace)
        })),
        ..ClientConfig::default()
    };
    let client = JdwpClient::from_stream_with_config(stream, config)?;

    let group = JdwpId::from_raw(1);
    let pending = client.enqueue(&thread_group_reference::Children::new(group))?;
    let request = vm.read_packet()?;
    let reply = ChildrenReply {
        child_threads: vec![thread_id(2)],
        child_groups: vec![],
    };
    vm.reply(request.header.id(), &reply)?;
    assert_eq!(pending.wait()?, reply);

    let seen = seen.lock().unwrap();
    let fields = seen
        .iter()
        .map(|t| (t.direction, t.owner, t.field))
        .collect::<Vec<_>>();
    assert_eq!(
        fields,
        [
            (TraceDirection::Write, "ThreadGroupID", "0"),
            (TraceDirection::Write, "Children", "group"),
            (TraceDirection::Read, "ThreadID", "0"),
            (TraceDirection::Read, "ChildrenReply", "child_threads"),
            (TraceDirection::Read, "ChildrenReply", "child_groups"),
        ]
    );
    Ok(())
}
