//! Typed views over the answer section of a full response.

use crate::dns::dig::Dig;
use crate::dns::forwarding::RecordTypeMapper;
use digtrace_domain::{DigError, RecordType};
use hickory_proto::op::Message;
use hickory_proto::rr::rdata::{A, AAAA, CAA, CNAME, MX, NS, PTR, SRV, TXT};
use hickory_proto::rr::{RData, Record};

fn project<T>(message: &Message, pick: impl Fn(&RData) -> Option<T>) -> Vec<T> {
    message
        .answers()
        .iter()
        .filter_map(|record| pick(record.data()))
        .collect()
}

impl Dig {
    pub async fn a(&self, domain: &str) -> Result<Vec<A>, DigError> {
        let msg = self.get_msg(RecordType::A, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::A(a) => Some(a.clone()),
            _ => None,
        }))
    }

    pub async fn aaaa(&self, domain: &str) -> Result<Vec<AAAA>, DigError> {
        let msg = self.get_msg(RecordType::AAAA, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::AAAA(aaaa) => Some(aaaa.clone()),
            _ => None,
        }))
    }

    pub async fn ns(&self, domain: &str) -> Result<Vec<NS>, DigError> {
        let msg = self.get_msg(RecordType::NS, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::NS(ns) => Some(ns.clone()),
            _ => None,
        }))
    }

    pub async fn cname(&self, domain: &str) -> Result<Vec<CNAME>, DigError> {
        let msg = self.get_msg(RecordType::CNAME, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::CNAME(cname) => Some(cname.clone()),
            _ => None,
        }))
    }

    pub async fn ptr(&self, domain: &str) -> Result<Vec<PTR>, DigError> {
        let msg = self.get_msg(RecordType::PTR, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::PTR(ptr) => Some(ptr.clone()),
            _ => None,
        }))
    }

    pub async fn txt(&self, domain: &str) -> Result<Vec<TXT>, DigError> {
        let msg = self.get_msg(RecordType::TXT, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::TXT(txt) => Some(txt.clone()),
            _ => None,
        }))
    }

    pub async fn mx(&self, domain: &str) -> Result<Vec<MX>, DigError> {
        let msg = self.get_msg(RecordType::MX, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::MX(mx) => Some(mx.clone()),
            _ => None,
        }))
    }

    pub async fn srv(&self, domain: &str) -> Result<Vec<SRV>, DigError> {
        let msg = self.get_msg(RecordType::SRV, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::SRV(srv) => Some(srv.clone()),
            _ => None,
        }))
    }

    pub async fn caa(&self, domain: &str) -> Result<Vec<CAA>, DigError> {
        let msg = self.get_msg(RecordType::CAA, domain).await?;
        Ok(project(&msg, |d| match d {
            RData::CAA(caa) => Some(caa.clone()),
            _ => None,
        }))
    }

    /// SPF (type 99) records; the codec keeps their data opaque.
    pub async fn spf(&self, domain: &str) -> Result<Vec<Record>, DigError> {
        let msg = self.get_msg(RecordType::SPF, domain).await?;
        let spf = RecordTypeMapper::to_hickory(&RecordType::SPF);
        Ok(msg
            .answers()
            .iter()
            .filter(|record| record.record_type() == spf)
            .cloned()
            .collect())
    }

    /// Every answer record of an ANY query.
    pub async fn any(&self, domain: &str) -> Result<Vec<Record>, DigError> {
        let msg = self.get_msg(RecordType::ANY, domain).await?;
        Ok(msg.answers().to_vec())
    }
}
